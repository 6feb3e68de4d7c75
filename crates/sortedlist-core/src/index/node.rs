use crate::types::{Nat256, NodeId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

///
/// NodeState
///
/// Lifecycle of one record: allocated, then linked by insert, then retired
/// by remove. A retired record keeps its value but never links again.
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum NodeState {
    #[default]
    Allocated,
    Linked,
    Retired,
}

///
/// Node
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Node {
    id: NodeId,
    value: Nat256,
    state: NodeState,
    left: NodeId,
    right: NodeId,
}

impl Node {
    pub(crate) const fn allocated(id: NodeId, value: Nat256) -> Self {
        Self {
            id,
            value,
            state: NodeState::Allocated,
            left: NodeId::HEAD,
            right: NodeId::HEAD,
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn value(&self) -> &Nat256 {
        &self.value
    }

    #[must_use]
    pub const fn state(&self) -> NodeState {
        self.state
    }

    /// True only while the record is part of the chain.
    #[must_use]
    pub const fn exists(&self) -> bool {
        matches!(self.state, NodeState::Linked)
    }

    #[must_use]
    pub const fn left(&self) -> NodeId {
        self.left
    }

    #[must_use]
    pub const fn right(&self) -> NodeId {
        self.right
    }

    #[must_use]
    pub const fn view(&self) -> NodeView {
        NodeView {
            exists: self.exists(),
            left: self.left,
            right: self.right,
        }
    }

    pub(crate) const fn link(&mut self, left: NodeId, right: NodeId) {
        self.state = NodeState::Linked;
        self.left = left;
        self.right = right;
    }

    pub(crate) const fn set_left(&mut self, left: NodeId) {
        self.left = left;
    }

    pub(crate) const fn set_right(&mut self, right: NodeId) {
        self.right = right;
    }

    pub(crate) const fn retire(&mut self) {
        self.state = NodeState::Retired;
        self.left = NodeId::HEAD;
        self.right = NodeId::HEAD;
    }
}

///
/// NodeView
///
/// The `(exists, left, right)` triple reported by `get_node`.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NodeView {
    pub exists: bool,
    pub left: NodeId,
    pub right: NodeId,
}

impl NodeView {
    /// Shape reported for unknown and unlinked ids.
    pub const UNLINKED: Self = Self {
        exists: false,
        left: NodeId::HEAD,
        right: NodeId::HEAD,
    };
}

impl From<NodeView> for (bool, NodeId, NodeId) {
    fn from(view: NodeView) -> Self {
        (view.exists, view.left, view.right)
    }
}

///
/// Adjacent
///
/// The `(exists, id)` pair reported by neighbour lookups.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Adjacent {
    pub exists: bool,
    pub id: NodeId,
}

impl Adjacent {
    pub const NONE: Self = Self {
        exists: false,
        id: NodeId::HEAD,
    };

    pub(crate) const fn to(id: NodeId) -> Self {
        Self {
            exists: !id.is_head(),
            id,
        }
    }
}

impl From<Adjacent> for (bool, NodeId) {
    fn from(adjacent: Adjacent) -> Self {
        (adjacent.exists, adjacent.id)
    }
}
