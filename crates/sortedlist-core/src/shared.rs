//! Shared handle for hosts that call one index from several threads.
//!
//! One lock guards the whole table and both counters, and every method holds
//! it for the full operation, so no caller can observe a half-spliced chain.

use crate::{
    config::IndexConfig,
    error::InternalError,
    index::{Adjacent, IndexSnapshot, NodeView, SortedLinkedIndex},
    types::{Nat256, NodeId},
};
use parking_lot::Mutex;
use std::sync::Arc;

///
/// SharedSortedIndex
///

#[derive(Clone, Debug, Default)]
pub struct SharedSortedIndex {
    inner: Arc<Mutex<SortedLinkedIndex>>,
}

impl SharedSortedIndex {
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self::from_index(SortedLinkedIndex::with_config(config))
    }

    #[must_use]
    pub fn from_index(index: SortedLinkedIndex) -> Self {
        Self {
            inner: Arc::new(Mutex::new(index)),
        }
    }

    /// Run `f` with shared access for the duration of one lock.
    pub fn read<R>(&self, f: impl FnOnce(&SortedLinkedIndex) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` with exclusive access; several mutations inside `f` are one
    /// atomic step as far as other handles can tell.
    pub fn write<R>(&self, f: impl FnOnce(&mut SortedLinkedIndex) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn allocate(&self, value: Nat256) -> Result<NodeId, InternalError> {
        self.write(|index| index.allocate(value))
    }

    pub fn insert(&self, id: NodeId) -> bool {
        self.write(|index| index.insert(id))
    }

    pub fn push(&self, value: Nat256) -> Result<NodeId, InternalError> {
        self.write(|index| index.push(value))
    }

    pub fn remove(&self, id: NodeId) -> bool {
        self.write(|index| index.remove(id))
    }

    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        self.read(|index| index.exists(id))
    }

    #[must_use]
    pub fn size_of(&self) -> u64 {
        self.read(SortedLinkedIndex::size_of)
    }

    #[must_use]
    pub fn get_node(&self, id: NodeId) -> NodeView {
        self.read(|index| index.get_node(id))
    }

    #[must_use]
    pub fn get_next_node(&self, id: NodeId) -> Adjacent {
        self.read(|index| index.get_next_node(id))
    }

    pub fn median(&self) -> Result<Nat256, InternalError> {
        self.read(SortedLinkedIndex::median)
    }

    #[must_use]
    pub fn snapshot(&self) -> IndexSnapshot {
        self.read(SortedLinkedIndex::snapshot)
    }
}

///
/// TESTS
///
