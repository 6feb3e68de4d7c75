//! Core runtime for SortedList: the id-linked sorted index, its value types,
//! events, observability, snapshot encoding, and configuration.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod event;
pub mod index;
pub mod obs;
pub mod serialize;
pub mod shared;
pub mod types;

///
/// CONSTANTS
///

/// The sentinel id meaning "no neighbour" at either end of the chain.
pub const HEAD: types::NodeId = types::NodeId::HEAD;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        index::{Adjacent, Direction, NodeView, SortedLinkedIndex},
        types::{Nat256, NodeId},
    };
}
