
use crate::{
    config::IndexConfig,
    error::{ErrorClass, ErrorOrigin},
    event::{EventLog, ListEvent},
    index::{Adjacent, Direction, NodeState, NodeView, SortedLinkedIndex},
    obs::{MetricsEvent, MetricsSink, OpKind, with_metrics_sink},
    types::{Nat256, NodeId},
};
use std::{cell::RefCell, rc::Rc};

///
/// Helpers
///

const fn id(raw: u64) -> NodeId {
    NodeId::new(raw)
}

const fn view(exists: bool, left: u64, right: u64) -> NodeView {
    NodeView {
        exists,
        left: NodeId::new(left),
        right: NodeId::new(right),
    }
}

fn push_all(index: &mut SortedLinkedIndex, values: &[u64]) -> Vec<NodeId> {
    values
        .iter()
        .map(|value| index.push((*value).into()).expect("push should allocate"))
        .collect()
}

fn chain_ids(index: &SortedLinkedIndex) -> Vec<u64> {
    index.iter().map(|(id, _)| id.get()).collect()
}

fn chain_values(index: &SortedLinkedIndex) -> Vec<u64> {
    index
        .iter()
        .map(|(_, value)| value.to_u128().and_then(|v| u64::try_from(v).ok()).unwrap())
        .collect()
}

// alice = 1, bob = 4, charly = 2; bob and charly allocated before either links.
fn alice_bob_charly() -> SortedLinkedIndex {
    let mut index = SortedLinkedIndex::new();
    let alice = index.allocate(1u64.into()).unwrap();
    index.insert(alice);
    let bob = index.allocate(4u64.into()).unwrap();
    let charly = index.allocate(2u64.into()).unwrap();
    index.insert(bob);
    index.insert(charly);

    index
}

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}

///
/// EMPTY INDEX
///

#[test]
fn empty_index_has_no_records() {
    let index = SortedLinkedIndex::new();

    assert_eq!(index.size_of(), 0);
    assert!(index.is_empty());
    assert_eq!(index.get_node(id(1)), view(false, 0, 0));
    assert_eq!(index.get_node(NodeId::HEAD), NodeView::UNLINKED);
    assert_eq!(index.first(), None);
    assert_eq!(index.last(), None);
    assert_eq!(index.last_id(), NodeId::HEAD);
    assert_eq!(index.iter().count(), 0);
    index.check_invariants().unwrap();
}

#[test]
fn median_of_empty_index_is_an_error() {
    let err = SortedLinkedIndex::new().median().unwrap_err();

    assert!(err.is_empty_index());
    assert_eq!(err.class, ErrorClass::NotFound);
    assert_eq!(err.origin, ErrorOrigin::Index);
}

///
/// ALLOCATE / INSERT
///

#[test]
fn allocate_issues_monotonic_ids_without_linking() {
    let mut index = SortedLinkedIndex::new();

    let a = index.allocate(7u64.into()).unwrap();
    let b = index.allocate(3u64.into()).unwrap();

    assert_eq!((a, b), (id(1), id(2)));
    assert_eq!(index.last_id(), id(2));
    assert_eq!(index.allocated(), 2);
    assert_eq!(index.size_of(), 0);
    assert!(!index.exists(a));
    assert_eq!(index.get_node(a), view(false, 0, 0));
    assert_eq!(index.node(b).map(|node| node.state()), Some(NodeState::Allocated));
    assert_eq!(index.value_of(b), Some(&Nat256::from(3u64)));
    index.check_invariants().unwrap();
}

#[test]
fn single_insert_links_between_head_sentinels() {
    let mut index = SortedLinkedIndex::new();
    let alice = index.allocate(1u64.into()).unwrap();

    assert!(index.insert(alice));
    assert_eq!(index.size_of(), 1);
    assert!(index.exists(alice));
    assert_eq!(index.get_node(alice), view(true, 0, 0));

    // second insert of a linked id changes nothing
    assert!(!index.insert(alice));
    assert_eq!(index.size_of(), 1);
    assert_eq!(index.get_node(alice), view(true, 0, 0));
}

#[test]
fn inserts_keep_ascending_order_across_allocation_order() {
    let index = alice_bob_charly();

    assert_eq!(chain_ids(&index), vec![1, 3, 2]);
    assert_eq!(chain_values(&index), vec![1, 2, 4]);
    assert_eq!(index.get_node(id(1)), view(true, 0, 3));
    assert_eq!(index.get_node(id(3)), view(true, 1, 2));
    assert_eq!(index.get_node(id(2)), view(true, 3, 0));
    assert_eq!(index.first(), Some(id(1)));
    assert_eq!(index.last(), Some(id(2)));
    index.check_invariants().unwrap();
}

#[test]
fn insert_at_head_middle_and_tail() {
    for (value, left, right) in [(0u64, 0u64, 1u64), (3, 3, 2), (10, 2, 0)] {
        let mut index = alice_bob_charly();
        let dean = index.allocate(value.into()).unwrap();

        assert!(index.insert(dean));
        assert_eq!(index.get_node(dean), view(true, left, right), "value {value}");
        index.check_invariants().unwrap();
    }
}

#[test]
fn equal_values_keep_insertion_order() {
    let mut index = SortedLinkedIndex::new();
    let ids = push_all(&mut index, &[5, 5, 3, 5, 3]);

    // ids: 1..=5 with values 5,5,3,5,3
    assert_eq!(ids, vec![id(1), id(2), id(3), id(4), id(5)]);
    assert_eq!(chain_ids(&index), vec![3, 5, 1, 2, 4]);
    index.check_invariants().unwrap();
}

#[test]
fn insert_of_unknown_or_head_id_is_a_no_op() {
    let mut index = alice_bob_charly();

    assert!(!index.insert(NodeId::HEAD));
    assert!(!index.insert(id(9999)));
    assert_eq!(index.size_of(), 3);
    assert_eq!(chain_ids(&index), vec![1, 3, 2]);
    assert_eq!(index.allocated(), 3);
}

#[test]
fn retired_ids_never_link_again() {
    let mut index = alice_bob_charly();

    assert!(index.remove(id(3)));
    assert!(!index.insert(id(3)));

    assert!(!index.exists(id(3)));
    assert_eq!(index.size_of(), 2);
    assert_eq!(index.node(id(3)).map(|node| node.state()), Some(NodeState::Retired));
    assert_eq!(index.value_of(id(3)), Some(&Nat256::from(2u64)));
    index.check_invariants().unwrap();
}

///
/// REMOVE
///

#[test]
fn remove_head_middle_and_tail_relinks_neighbours() {
    // alice (head of chain)
    let mut index = alice_bob_charly();
    assert!(index.remove(id(1)));
    assert_eq!(index.get_node(id(1)), view(false, 0, 0));
    assert_eq!(index.get_node(id(3)), view(true, 0, 2));
    assert_eq!(index.get_node(id(2)), view(true, 3, 0));
    assert_eq!(index.first(), Some(id(3)));
    assert_eq!(index.size_of(), 2);

    // bob (tail of chain)
    let mut index = alice_bob_charly();
    assert!(index.remove(id(2)));
    assert_eq!(index.get_node(id(2)), view(false, 0, 0));
    assert_eq!(index.get_node(id(1)), view(true, 0, 3));
    assert_eq!(index.get_node(id(3)), view(true, 1, 0));
    assert_eq!(index.last(), Some(id(3)));

    // charly (middle)
    let mut index = alice_bob_charly();
    assert!(index.remove(id(3)));
    assert_eq!(index.get_node(id(3)), view(false, 0, 0));
    assert_eq!(index.get_node(id(1)), view(true, 0, 2));
    assert_eq!(index.get_node(id(2)), view(true, 1, 0));
    index.check_invariants().unwrap();
}

#[test]
fn removing_every_record_empties_the_chain() {
    let mut index = alice_bob_charly();

    for raw in [3, 1, 2] {
        assert!(index.remove(id(raw)));
    }

    assert!(index.is_empty());
    assert_eq!(index.first(), None);
    assert_eq!(index.last(), None);
    index.check_invariants().unwrap();
}

#[test]
fn remove_of_unknown_head_or_unlinked_id_is_a_no_op() {
    let mut index = alice_bob_charly();
    let pending = index.allocate(8u64.into()).unwrap();
    let before = index.snapshot();

    assert!(!index.remove(id(9999)));
    assert!(!index.remove(NodeId::HEAD));
    assert!(!index.remove(pending));

    assert_eq!(index.snapshot(), before);
    assert!(index.remove(id(1)));
    assert!(!index.remove(id(1)));
    assert_eq!(index.size_of(), 2);
}

///
/// NEIGHBOURS & ITERATION
///

#[test]
fn neighbour_lookups_follow_links_only_for_linked_ids() {
    let mut index = alice_bob_charly();
    let pending = index.allocate(3u64.into()).unwrap();

    assert_eq!(
        index.get_next_node(id(1)),
        Adjacent {
            exists: true,
            id: id(3)
        }
    );
    assert_eq!(index.get_next_node(id(2)), Adjacent::NONE);
    assert_eq!(
        index.get_previous_node(id(2)),
        Adjacent {
            exists: true,
            id: id(3)
        }
    );
    assert_eq!(index.get_previous_node(id(1)), Adjacent::NONE);
    assert_eq!(index.get_adjacent(id(3), Direction::Asc), index.get_next_node(id(3)));
    assert_eq!(index.get_adjacent(id(3), Direction::Desc), index.get_previous_node(id(3)));

    assert_eq!(index.get_next_node(id(9999)), Adjacent::NONE);
    assert_eq!(index.get_next_node(NodeId::HEAD), Adjacent::NONE);
    assert_eq!(index.get_next_node(pending), Adjacent::NONE);

    index.remove(id(3));
    assert_eq!(index.get_next_node(id(3)), Adjacent::NONE);
    assert_eq!(<(bool, NodeId)>::from(index.get_next_node(id(1))), (true, id(2)));
}

#[test]
fn reverse_iteration_mirrors_forward_iteration() {
    let mut index = SortedLinkedIndex::new();
    push_all(&mut index, &[9, 2, 7, 2, 11]);

    let forward: Vec<_> = index.iter().map(|(id, _)| id).collect();
    let mut backward: Vec<_> = index.iter_rev().map(|(id, _)| id).collect();
    backward.reverse();

    assert_eq!(forward, backward);
    assert_eq!(index.iter().len(), 5);
    assert_eq!((&index).into_iter().count(), 5);
    assert_eq!(chain_values(&index), vec![2, 2, 7, 9, 11]);
}

///
/// MEDIAN
///

#[test]
fn median_of_odd_count_is_middle_value() {
    let mut index = SortedLinkedIndex::new();
    push_all(&mut index, &[40, 10, 30, 50, 20]);

    assert_eq!(index.median().unwrap(), 30u64.into());
}

#[test]
fn median_of_even_count_truncates_mean() {
    let mut index = SortedLinkedIndex::new();
    push_all(&mut index, &[4, 1, 2, 9]);

    // (2 + 4) / 2
    assert_eq!(index.median().unwrap(), 3u64.into());

    index.push(3u64.into()).unwrap();
    index.push(8u64.into()).unwrap();
    // 1 2 3 4 8 9 -> (3 + 4) / 2, truncated
    assert_eq!(index.median().unwrap(), 3u64.into());
}

#[test]
fn median_of_two_maxima_does_not_overflow() {
    let mut index = SortedLinkedIndex::new();
    index.push(Nat256::max()).unwrap();
    index.push(Nat256::max()).unwrap();

    assert_eq!(index.median().unwrap(), Nat256::max());
}

#[test]
fn median_ignores_unlinked_and_retired_records() {
    let mut index = SortedLinkedIndex::new();
    let ids = push_all(&mut index, &[1, 100, 5]);
    index.allocate(1_000u64.into()).unwrap();
    index.remove(ids[1]);

    assert_eq!(index.median().unwrap(), 3u64.into());
}

///
/// EXHAUSTION
///

#[test]
fn allocate_fails_once_id_space_is_spent() {
    let mut index = SortedLinkedIndex::new();
    index.force_next_id(NodeId::MAX);

    let err = index.allocate(1u64.into()).unwrap_err();

    assert!(err.is_exhausted());
    assert_eq!(err.class, ErrorClass::Internal);
    assert_eq!(err.origin, ErrorOrigin::Allocator);
    assert_eq!(index.allocated(), 0);
    assert!(index.push(1u64.into()).is_err());
}

#[test]
fn last_issued_id_is_one_below_max() {
    let mut index = SortedLinkedIndex::new();
    let last = NodeId::new(u64::MAX - 1);
    index.force_next_id(last);

    assert_eq!(index.allocate(1u64.into()).unwrap(), last);
    assert_eq!(index.last_id(), last);

    let err = index.allocate(2u64.into()).unwrap_err();
    assert!(err.is_exhausted());
    assert_eq!(err.message, format!("node id space exhausted after id {last}"));
}

///
/// EVENTS
///

#[test]
fn events_announce_successful_mutations_only() {
    let log = EventLog::new();
    let mut index = SortedLinkedIndex::new();
    index.set_event_sink(log.clone());

    let a = index.push(10u64.into()).unwrap();
    let b = index.push(5u64.into()).unwrap();
    assert!(!index.insert(a));
    assert!(!index.remove(id(9999)));
    assert!(!index.remove(NodeId::HEAD));
    assert!(index.remove(a));

    assert_eq!(
        log.drain(),
        vec![
            ListEvent::Inserted {
                id: a,
                value: 10u64.into(),
                left: NodeId::HEAD,
                right: NodeId::HEAD,
            },
            ListEvent::Inserted {
                id: b,
                value: 5u64.into(),
                left: NodeId::HEAD,
                right: a,
            },
            ListEvent::Removed {
                id: a,
                value: 10u64.into(),
            },
        ]
    );
}

#[test]
fn disabled_events_reach_no_sink() {
    let log = EventLog::new();
    let mut index = SortedLinkedIndex::with_config(IndexConfig::default().with_events(false));
    index.set_event_sink(log.clone());

    let a = index.push(1u64.into()).unwrap();
    index.remove(a);

    assert!(log.is_empty());
    assert!(index.take_event_sink().is_some());
    assert!(index.take_event_sink().is_none());
}

///
/// METRICS
///

#[test]
fn metrics_events_describe_each_operation() {
    let sink = Rc::new(RecordingSink::default());

    with_metrics_sink(sink.clone(), || {
        let mut index = SortedLinkedIndex::new();
        index.push(2u64.into()).unwrap();
        index.push(1u64.into()).unwrap();
        index.insert(id(1));
        index.remove(id(7));
        index.median().unwrap();
        index.remove(id(2));
    });

    assert_eq!(
        *sink.events.borrow(),
        vec![
            MetricsEvent::Allocate,
            MetricsEvent::Insert { scanned: 0 },
            MetricsEvent::Allocate,
            MetricsEvent::Insert { scanned: 1 },
            MetricsEvent::Noop { op: OpKind::Insert },
            MetricsEvent::Noop { op: OpKind::Remove },
            MetricsEvent::Median { scanned: 2 },
            MetricsEvent::Remove,
        ]
    );
}

#[test]
fn disabled_metrics_record_nothing() {
    let sink = Rc::new(RecordingSink::default());

    with_metrics_sink(sink.clone(), || {
        let mut index = SortedLinkedIndex::with_config(IndexConfig::default().with_metrics(false));
        index.push(2u64.into()).unwrap();
        index.remove(id(1));
    });

    assert!(sink.events.borrow().is_empty());
}

#[test]
fn debug_scan_tracing_leaves_results_unchanged() {
    let mut traced = SortedLinkedIndex::with_config(IndexConfig::default().with_debug(true));
    let mut plain = SortedLinkedIndex::new();
    let values = [8, 3, 3, 12, 0, 7];

    push_all(&mut traced, &values);
    push_all(&mut plain, &values);

    assert_eq!(traced.snapshot(), plain.snapshot());
}
