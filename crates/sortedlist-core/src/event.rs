//! List change events.
//!
//! The index announces each successful insert and remove through an
//! [`EventSink`]. No-ops announce nothing, so a host can use "no event" as
//! the signal that a call had no effect.

use crate::types::{Nat256, NodeId};
use candid::CandidType;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{mem, sync::Arc};

///
/// ListEvent
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ListEvent {
    Inserted {
        id: NodeId,
        value: Nat256,
        left: NodeId,
        right: NodeId,
    },
    Removed {
        id: NodeId,
        value: Nat256,
    },
}

impl ListEvent {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Inserted { id, .. } | Self::Removed { id, .. } => *id,
        }
    }
}

///
/// EventSink
///

pub trait EventSink {
    fn emit(&self, event: &ListEvent);
}

///
/// NoopEventSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _: &ListEvent) {}
}

///
/// EventLog
///
/// Recording sink. Clones share one buffer, so a host can keep a handle
/// while the index owns the installed copy.
///

#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<ListEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<ListEvent> {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&self) -> Vec<ListEvent> {
        mem::take(&mut *self.events.lock())
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: &ListEvent) {
        self.events.lock().push(event.clone());
    }
}

///
/// TESTS
///
