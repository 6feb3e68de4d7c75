use candid::CandidType;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// NodeId
///
/// Stable identifier of one record in a sorted index.
/// Ids are issued monotonically from 1 and never reused; `0` is reserved
/// for the `HEAD` sentinel, which stands for "no neighbour" at both ends
/// of the chain.
///

#[derive(
    CandidType,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// The sentinel id. Never allocated, never linked.
    pub const HEAD: Self = Self(0);

    /// First id handed out by a fresh index.
    pub const FIRST: Self = Self(1);

    /// Upper bound of the id space. Never issued itself: the counter holds
    /// the next id to hand out, so the last id an index issues is `MAX - 1`.
    pub const MAX: Self = Self(u64::MAX);

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_head(self) -> bool {
        self.0 == 0
    }

    /// Return the id issued after this one, or `None` once the id space is spent.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }

    // Arena slot backing this id; `HEAD` has none.
    pub(crate) fn slot(self) -> Option<usize> {
        self.0
            .checked_sub(1)
            .and_then(|slot| usize::try_from(slot).ok())
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl PartialEq<u64> for NodeId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

///
/// TESTS
///
