//! ## Crate layout
//! - `core`: the sorted index engine, value types, events, observability,
//!   snapshot encoding, and configuration.
//! - `error`: the public error type hosts return across their interfaces.
//!
//! The `prelude` module mirrors the surface a host needs to own an index.

pub use sortedlist_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::HEAD;
pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Host Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::IndexConfig,
        event::{EventLog, EventSink, ListEvent, NoopEventSink},
        index::{Adjacent, Direction, IndexSnapshot, NodeView, SortedLinkedIndex},
        obs::{MetricsReport, metrics_report},
        shared::SharedSortedIndex,
        types::{Nat256, NodeId},
    };
    pub use crate::{Error, ErrorKind, HEAD};
    pub use candid::CandidType;
    pub use serde::{Deserialize, Serialize};
}
