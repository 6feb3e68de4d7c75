//! Metrics sink boundary.
//!
//! Index logic MUST NOT touch `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.

use crate::obs::metrics::{self, MetricsReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// OpKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpKind {
    Insert,
    Remove,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Allocate,
    Insert { scanned: u64 },
    Remove,
    Noop { op: OpKind },
    Median { scanned: u64 },
    Restore { nodes: u64 },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| {
            let ops = &mut m.ops;

            match event {
                MetricsEvent::Allocate => ops.allocations = ops.allocations.saturating_add(1),
                MetricsEvent::Insert { scanned } => {
                    ops.inserts = ops.inserts.saturating_add(1);
                    ops.nodes_scanned = ops.nodes_scanned.saturating_add(scanned);
                }
                MetricsEvent::Remove => ops.removes = ops.removes.saturating_add(1),
                MetricsEvent::Noop { op } => match op {
                    OpKind::Insert => ops.noop_inserts = ops.noop_inserts.saturating_add(1),
                    OpKind::Remove => ops.noop_removes = ops.noop_removes.saturating_add(1),
                },
                MetricsEvent::Median { scanned } => {
                    ops.median_calls = ops.median_calls.saturating_add(1);
                    ops.nodes_scanned = ops.nodes_scanned.saturating_add(scanned);
                }
                MetricsEvent::Restore { nodes } => {
                    ops.restores = ops.restores.saturating_add(1);
                    ops.restored_nodes = ops.restored_nodes.saturating_add(nodes);
                }
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's counters.
#[must_use]
pub fn metrics_report() -> MetricsReport {
    metrics::report()
}

/// Reset the current thread's counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
