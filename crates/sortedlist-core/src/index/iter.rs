use crate::{
    index::{Direction, SortedLinkedIndex},
    types::{Nat256, NodeId},
};
use std::iter::FusedIterator;

///
/// Iter
///
/// Walks the chain by following links, never by id order.
/// Yields at most `size` items even if the links were to loop.
///

#[derive(Clone, Debug)]
pub struct Iter<'a> {
    index: &'a SortedLinkedIndex,
    cursor: NodeId,
    direction: Direction,
    remaining: u64,
}

impl<'a> Iter<'a> {
    pub(crate) const fn new(
        index: &'a SortedLinkedIndex,
        start: NodeId,
        direction: Direction,
        remaining: u64,
    ) -> Self {
        Self {
            index,
            cursor: start,
            direction,
            remaining,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a Nat256);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.index.node(self.cursor).filter(|node| node.exists())?;
        self.cursor = match self.direction {
            Direction::Asc => node.right(),
            Direction::Desc => node.left(),
        };
        self.remaining -= 1;

        Some((node.id(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);

        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
