mod common;

use canopy_bt::{BTree, BtError, BtStatus, NodeSpec, Sequence, ROOT};
use canopy_core::{Blackboard, TickContext};
use canopy_trace::{TraceLog, TRACE_LOG};
use common::{Counts, Harness, Probe};

#[test]
fn on_start_fires_only_when_the_node_opens() {
    let probe = Probe::new(BtStatus::Running);
    let mut h = Harness::new(probe.spec());

    for _ in 0..3 {
        assert_eq!(h.step(), BtStatus::Running);
    }

    assert_eq!(
        probe.counts(),
        Counts {
            starts: 1,
            ticks: 3,
            ends: 0
        }
    );
    assert!(h.is_open(1));
}

#[test]
fn on_end_fires_when_the_node_completes() {
    let probe = Probe::new(BtStatus::Running);
    let mut h = Harness::new(probe.spec());
    h.step();

    probe.set(BtStatus::Success);
    assert_eq!(h.step(), BtStatus::Success);
    assert!(!h.is_open(1));
    assert_eq!(h.status(1), Some(BtStatus::Success));

    // Closed again, so the next visit is a fresh start.
    h.step();
    assert_eq!(
        probe.counts(),
        Counts {
            starts: 2,
            ticks: 3,
            ends: 2
        }
    );
}

#[test]
fn error_closes_the_node_and_flags_the_tree() {
    let probe = Probe::new(BtStatus::Error);
    let mut h = Harness::new(probe.spec());
    h.bb.set(TRACE_LOG, TraceLog::default());

    assert_eq!(h.step(), BtStatus::Error);

    assert!(!h.is_open(1));
    assert_eq!(h.status(1), Some(BtStatus::Error));
    assert_eq!(probe.counts().ends, 1);
    assert!(h.tree.is_errored());
    let log = h.bb.get(TRACE_LOG).expect("trace log installed");
    assert_eq!(log.with_tag("bt.tree.error").count(), 1);
}

#[test]
fn errored_tree_refuses_ticks_until_reset() {
    let probe = Probe::new(BtStatus::Error);
    let mut h = Harness::new(probe.spec());
    h.step();

    let ctx = h.ctx();
    assert_eq!(h.tree.try_tick(&ctx, &mut h.bb), Err(BtError::Errored));
    assert_eq!(h.step(), BtStatus::Error);
    assert_eq!(probe.ticks(), 1);

    h.tree.reset(&ctx, &mut h.bb);
    probe.set(BtStatus::Success);
    assert!(!h.tree.is_errored());
    assert_eq!(h.step(), BtStatus::Success);
    assert_eq!(probe.ticks(), 2);
}

#[test]
fn ticking_before_activation_is_refused() {
    let probe = Probe::new(BtStatus::Success);
    let mut tree = BTree::new(probe.spec());
    let mut bb = Blackboard::new();
    let ctx = TickContext::new(0, 0.1);

    assert_eq!(tree.try_tick(&ctx, &mut bb), Err(BtError::NotInitialized));
    assert_eq!(tree.tick(&ctx, &mut bb), BtStatus::Error);
    assert_eq!(probe.ticks(), 0);
    assert!(!tree.is_errored());
}

#[test]
fn activation_happens_once() {
    let mut tree = BTree::new(Probe::new(BtStatus::Success).spec());
    let mut bb = Blackboard::new();

    assert_eq!(tree.initialize_for_agent(4u32, &mut bb), Ok(()));
    assert_eq!(
        tree.initialize_for_agent(5u32, &mut bb),
        Err(BtError::AlreadyInitialized { agent: 4 })
    );
    assert!(tree.is_initialized());
}

#[test]
fn visited_flags_follow_the_last_traversal() {
    let first = Probe::new(BtStatus::Failure);
    let second = Probe::new(BtStatus::Success);
    // root(0) -> sequence(1) -> [first(2), second(3)]
    let mut h = Harness::new(NodeSpec::new(Sequence).children([first.spec(), second.spec()]));

    assert_eq!(h.step(), BtStatus::Failure);
    let snapshot = h.tree.snapshot();
    let visited: Vec<_> = snapshot.visited_nodes().map(|n| n.index).collect();
    assert_eq!(visited, vec![ROOT, 1, 2]);
    assert_eq!(h.status(3), None);

    first.set(BtStatus::Success);
    h.step();
    let visited: Vec<_> = h.tree.snapshot().visited_nodes().map(|n| n.index).collect();
    assert_eq!(visited, vec![ROOT, 1, 2, 3]);
}

#[test]
fn clock_advances_by_each_tick_delta() {
    let mut h = Harness::new(Probe::new(BtStatus::Running).spec());

    h.step_dt(0.5);
    h.step_dt(0.25);

    assert_eq!(h.tree.elapsed_seconds(), 0.75);
}
