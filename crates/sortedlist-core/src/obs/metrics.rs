use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// MetricsState
/// Ephemeral, in-memory operation counters. One per thread; an IC canister
/// runs on exactly one.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct MetricsState {
    pub(crate) ops: OpCounters,
}

///
/// OpCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OpCounters {
    // Mutations that changed state
    pub allocations: u64,
    pub inserts: u64,
    pub removes: u64,

    // Mutations that were quiet no-ops
    pub noop_inserts: u64,
    pub noop_removes: u64,

    // Reads
    pub median_calls: u64,

    // Chain nodes visited by insertion scans and median walks
    pub nodes_scanned: u64,

    // Snapshot restores
    pub restores: u64,
    pub restored_nodes: u64,
}

///
/// MetricsReport
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetricsReport {
    pub ops: OpCounters,
}

thread_local! {
    static METRICS_STATE: RefCell<MetricsState> = RefCell::new(MetricsState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&MetricsState) -> R) -> R {
    METRICS_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsState) -> R) -> R {
    METRICS_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = MetricsState::default());
}

pub(crate) fn report() -> MetricsReport {
    with_state(|m| MetricsReport { ops: m.ops.clone() })
}
