//! Sorted, id-linked record index.
//!
//! Records live in one owning arena and refer to each other only by
//! [`NodeId`]. Linked records form a doubly-linked chain in ascending value
//! order; `NodeId::HEAD` marks both ends.
//!
//! Mutations that have nothing to do (inserting a linked id, removing an
//! unknown one) are quiet no-ops: they return `false`, change nothing, and
//! emit no event. Only id exhaustion and the median of an empty index are
//! reported as errors.

mod direction;
mod invariants;
mod iter;
mod node;
mod snapshot;

#[cfg(test)]
mod tests;

pub use direction::Direction;
pub use iter::Iter;
pub use node::{Adjacent, Node, NodeState, NodeView};
pub use snapshot::IndexSnapshot;

use crate::{
    config::IndexConfig,
    error::{IndexError, InternalError},
    event::{EventSink, ListEvent},
    obs::{MetricsEvent, OpKind, sink},
    types::{Nat256, NodeId},
};
use std::fmt;
use tracing::{debug, error, trace};

///
/// SortedLinkedIndex
///

pub struct SortedLinkedIndex {
    // slot `n - 1` holds id `n`
    nodes: Vec<Node>,
    next_id: NodeId,
    size: u64,
    first: NodeId,
    last: NodeId,
    config: IndexConfig,
    sink: Option<Box<dyn EventSink + Send>>,
}

impl SortedLinkedIndex {
    // ======================================================================
    // Construction & configuration
    // ======================================================================

    #[must_use]
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    #[must_use]
    pub const fn with_config(config: IndexConfig) -> Self {
        Self {
            nodes: Vec::new(),
            next_id: NodeId::FIRST,
            size: 0,
            first: NodeId::HEAD,
            last: NodeId::HEAD,
            config,
            sink: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Install the sink that receives insert/remove announcements.
    pub fn set_event_sink(&mut self, sink: impl EventSink + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Remove and return the installed sink, if any.
    pub fn take_event_sink(&mut self) -> Option<Box<dyn EventSink + Send>> {
        self.sink.take()
    }

    // ======================================================================
    // Mutations
    // ======================================================================

    /// Create an unlinked record holding `value` and return its fresh id.
    ///
    /// The last id ever issued is `NodeId::MAX - 1`; once it is spent every
    /// further call fails with `IndexError::IdSpaceExhausted`.
    pub fn allocate(&mut self, value: Nat256) -> Result<NodeId, InternalError> {
        let id = self.next_id;
        let Some(next_id) = id.checked_next() else {
            let last = self.last_id();
            error!(last_id = %last, "node id space exhausted");

            return Err(IndexError::IdSpaceExhausted { last }.into());
        };

        debug!(node_id = %id, %value, "node allocated");
        self.nodes.push(Node::allocated(id, value));
        self.next_id = next_id;
        self.record(MetricsEvent::Allocate);

        Ok(id)
    }

    /// Link an allocated record into the chain at its sorted position.
    ///
    /// Equal values keep insertion order: the new record goes after every
    /// linked record with the same value. Returns `false` without touching
    /// anything if `id` is unknown, `HEAD`, already linked, or retired.
    pub fn insert(&mut self, id: NodeId) -> bool {
        let (left, right, scanned) = match self.node(id) {
            Some(node) if node.state() == NodeState::Allocated => {
                self.insert_position(node.value())
            }
            node => {
                trace!(
                    node_id = %id,
                    reason = Self::noop_reason(node),
                    "insert skipped"
                );
                self.record(MetricsEvent::Noop { op: OpKind::Insert });

                return false;
            }
        };

        match self.node_mut(left) {
            Some(node) => node.set_right(id),
            None => self.first = id,
        }
        match self.node_mut(right) {
            Some(node) => node.set_left(id),
            None => self.last = id,
        }
        if let Some(node) = self.node_mut(id) {
            node.link(left, right);
        }
        self.size += 1;

        debug!(node_id = %id, %left, %right, size = self.size, "node inserted");
        self.record(MetricsEvent::Insert { scanned });
        self.emit(|index| ListEvent::Inserted {
            id,
            value: index.value_or_default(id),
            left,
            right,
        });

        true
    }

    /// Allocate `value` and link it in one step.
    pub fn push(&mut self, value: Nat256) -> Result<NodeId, InternalError> {
        let id = self.allocate(value)?;
        self.insert(id);

        Ok(id)
    }

    /// Unlink a record, joining its neighbours.
    ///
    /// The record keeps its value and id but can never be linked again.
    /// Returns `false` without touching anything if `id` is `HEAD`, unknown,
    /// or not currently linked.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let (left, right) = match self.node(id) {
            Some(node) if node.exists() => (node.left(), node.right()),
            node => {
                trace!(
                    node_id = %id,
                    reason = Self::noop_reason(node),
                    "remove skipped"
                );
                self.record(MetricsEvent::Noop { op: OpKind::Remove });

                return false;
            }
        };

        match self.node_mut(left) {
            Some(node) => node.set_right(right),
            None => self.first = right,
        }
        match self.node_mut(right) {
            Some(node) => node.set_left(left),
            None => self.last = left,
        }
        if let Some(node) = self.node_mut(id) {
            node.retire();
        }
        self.size -= 1;

        debug!(node_id = %id, size = self.size, "node removed");
        self.record(MetricsEvent::Remove);
        self.emit(|index| ListEvent::Removed {
            id,
            value: index.value_or_default(id),
        });

        true
    }

    // ======================================================================
    // Queries
    // ======================================================================

    /// True iff `id` is currently linked. `HEAD` never is.
    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::exists)
    }

    /// Number of linked records.
    #[must_use]
    pub const fn size_of(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Most recently allocated id, or `HEAD` before the first allocation.
    #[must_use]
    pub const fn last_id(&self) -> NodeId {
        NodeId::new(self.next_id.get() - 1)
    }

    /// Number of records ever allocated, linked or not.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        id.slot().and_then(|slot| self.nodes.get(slot))
    }

    /// `(exists, left, right)` for `id`; unknown ids report `NodeView::UNLINKED`.
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> NodeView {
        self.node(id).map_or(NodeView::UNLINKED, Node::view)
    }

    /// Stored value of any allocated record, linked or not.
    #[must_use]
    pub fn value_of(&self, id: NodeId) -> Option<&Nat256> {
        self.node(id).map(Node::value)
    }

    /// Successor of a linked `id`; `Adjacent::NONE` if `id` is not linked.
    #[must_use]
    pub fn get_next_node(&self, id: NodeId) -> Adjacent {
        self.get_adjacent(id, Direction::Asc)
    }

    /// Predecessor of a linked `id`; `Adjacent::NONE` if `id` is not linked.
    #[must_use]
    pub fn get_previous_node(&self, id: NodeId) -> Adjacent {
        self.get_adjacent(id, Direction::Desc)
    }

    #[must_use]
    pub fn get_adjacent(&self, id: NodeId, direction: Direction) -> Adjacent {
        // re-check the input's own state; never follow links of an unlinked record
        match self.node(id) {
            Some(node) if node.exists() => Adjacent::to(match direction {
                Direction::Asc => node.right(),
                Direction::Desc => node.left(),
            }),
            _ => Adjacent::NONE,
        }
    }

    /// Smallest linked id.
    #[must_use]
    pub const fn first(&self) -> Option<NodeId> {
        if self.first.is_head() {
            None
        } else {
            Some(self.first)
        }
    }

    /// Largest linked id.
    #[must_use]
    pub const fn last(&self) -> Option<NodeId> {
        if self.last.is_head() {
            None
        } else {
            Some(self.last)
        }
    }

    /// Linked records in ascending order.
    #[must_use]
    pub const fn iter(&self) -> Iter<'_> {
        Iter::new(self, self.first, Direction::Asc, self.size)
    }

    /// Linked records in descending order.
    #[must_use]
    pub const fn iter_rev(&self) -> Iter<'_> {
        Iter::new(self, self.last, Direction::Desc, self.size)
    }

    #[must_use]
    pub fn values(&self) -> Vec<Nat256> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Median of the linked values.
    ///
    /// With an even count this is the mean of the two middle values,
    /// truncated toward zero. An empty index has no median.
    pub fn median(&self) -> Result<Nat256, InternalError> {
        let n = self.size;
        if n == 0 {
            return Err(IndexError::Empty.into());
        }

        let upper = n / 2;
        let lower = if n % 2 == 0 { upper - 1 } else { upper };
        self.record(MetricsEvent::Median { scanned: upper + 1 });

        let mut lower_value = None;
        for (pos, (_, value)) in (0u64..).zip(self.iter()) {
            if pos == lower {
                lower_value = Some(value);
            }
            if pos == upper {
                return match lower_value {
                    Some(lower_value) => Ok(lower_value.midpoint(value)),
                    None => Err(InternalError::index_invariant(format!(
                        "median walk missed position {lower}"
                    ))),
                };
            }
        }

        Err(InternalError::index_invariant(format!(
            "chain ended before position {upper} (size {n})"
        )))
    }

    // ======================================================================
    // Internals
    // ======================================================================

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        id.slot().and_then(|slot| self.nodes.get_mut(slot))
    }

    // Scan ascending until the first value strictly greater than `value`.
    // Returns the neighbours the new record goes between and the nodes visited.
    fn insert_position(&self, value: &Nat256) -> (NodeId, NodeId, u64) {
        let mut left = NodeId::HEAD;
        let mut cursor = self.first;
        let mut scanned = 0u64;

        while let Some(node) = self.node(cursor) {
            scanned += 1;
            if node.value() > value {
                break;
            }
            if self.config.debug {
                trace!(visited = %cursor, visited_value = %node.value(), "insert scan advanced");
            }

            left = cursor;
            cursor = node.right();
        }

        (left, cursor, scanned)
    }

    const fn noop_reason(node: Option<&Node>) -> &'static str {
        match node {
            None => "unknown id",
            Some(node) => match node.state() {
                NodeState::Allocated => "not linked",
                NodeState::Linked => "already linked",
                NodeState::Retired => "retired",
            },
        }
    }

    fn value_or_default(&self, id: NodeId) -> Nat256 {
        self.value_of(id).cloned().unwrap_or_default()
    }

    fn record(&self, event: MetricsEvent) {
        if self.config.metrics {
            sink::record(event);
        }
    }

    fn emit(&self, event: impl FnOnce(&Self) -> ListEvent) {
        if !self.config.events {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.emit(&event(self));
        }
    }

    #[cfg(test)]
    pub(crate) const fn force_next_id(&mut self, next_id: NodeId) {
        self.next_id = next_id;
    }
}

impl Default for SortedLinkedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SortedLinkedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedLinkedIndex")
            .field("size", &self.size)
            .field("next_id", &self.next_id)
            .field("first", &self.first)
            .field("last", &self.last)
            .field("allocated", &self.nodes.len())
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a SortedLinkedIndex {
    type Item = (NodeId, &'a Nat256);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
