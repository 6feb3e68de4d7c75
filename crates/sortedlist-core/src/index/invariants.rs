use crate::{
    error::InternalError,
    index::{NodeState, SortedLinkedIndex},
    types::NodeId,
};

impl SortedLinkedIndex {
    /// Verify the structural invariants of the table and chain.
    ///
    /// Reports the first violation found as an index invariant error.
    pub fn check_invariants(&self) -> Result<(), InternalError> {
        self.check_table()?;
        self.check_chain()
    }

    // Phase 1: arena shape, counters, and unlinked-record neighbours.
    fn check_table(&self) -> Result<(), InternalError> {
        let expected_next = u64::try_from(self.nodes.len())
            .ok()
            .and_then(|len| len.checked_add(1));
        if expected_next != Some(self.next_id.get()) {
            return Err(InternalError::index_invariant(format!(
                "next id {} does not follow {} allocated records",
                self.next_id,
                self.nodes.len()
            )));
        }

        let mut linked = 0u64;
        for (slot, node) in self.nodes.iter().enumerate() {
            if node.id().slot() != Some(slot) {
                return Err(InternalError::index_invariant(format!(
                    "record {} stored in slot {slot}",
                    node.id()
                )));
            }

            if node.state() == NodeState::Linked {
                linked += 1;
            } else if !node.left().is_head() || !node.right().is_head() {
                return Err(InternalError::index_invariant(format!(
                    "unlinked record {} still points at {} / {}",
                    node.id(),
                    node.left(),
                    node.right()
                )));
            }
        }

        if linked != self.size {
            return Err(InternalError::index_invariant(format!(
                "size {} but {linked} records are linked",
                self.size
            )));
        }

        Ok(())
    }

    // Phase 2: walk from the first record; links must agree both ways,
    // values must not decrease, and the walk must end exactly at `last`.
    fn check_chain(&self) -> Result<(), InternalError> {
        if self.size == 0 {
            if !self.first.is_head() || !self.last.is_head() {
                return Err(InternalError::index_invariant(format!(
                    "empty index has ends {} / {}",
                    self.first, self.last
                )));
            }

            return Ok(());
        }

        let mut prev = NodeId::HEAD;
        let mut prev_value = None;
        let mut cursor = self.first;
        let mut steps = 0u64;

        while !cursor.is_head() {
            if steps == self.size {
                return Err(InternalError::index_invariant(format!(
                    "chain longer than size {}; cycle through {cursor}",
                    self.size
                )));
            }

            let node = self
                .node(cursor)
                .filter(|node| node.exists())
                .ok_or_else(|| {
                    InternalError::index_invariant(format!(
                        "chain reaches {cursor}, which is not a linked record"
                    ))
                })?;

            if node.left() != prev {
                return Err(InternalError::index_invariant(format!(
                    "record {cursor} has left {} but follows {prev}",
                    node.left()
                )));
            }
            if prev_value.is_some_and(|prev_value| node.value() < prev_value) {
                return Err(InternalError::index_invariant(format!(
                    "record {cursor} breaks ascending order after {prev}"
                )));
            }

            prev = cursor;
            prev_value = Some(node.value());
            cursor = node.right();
            steps += 1;
        }

        if steps != self.size {
            return Err(InternalError::index_invariant(format!(
                "chain visits {steps} records but size is {}",
                self.size
            )));
        }
        if prev != self.last {
            return Err(InternalError::index_invariant(format!(
                "chain ends at {prev} but last is {}",
                self.last
            )));
        }

        Ok(())
    }
}
