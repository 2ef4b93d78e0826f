mod common;

use canopy_bt::{BTree, BtStatus, Condition, NodeSpec, Selector, Sequence};
use canopy_core::{BbKey, Blackboard, TickContext};
use canopy_trace::{TraceLog, TRACE_LOG};
use common::{Harness, Probe};

const STOP: BbKey<bool> = BbKey::new("stop");

// root(0) -> selector(1) -> [stop?(2), move(3)]
fn make_tree(mover: &Probe) -> NodeSpec {
    let stop = Condition::new(|ctx: &canopy_bt::BtContext<'_>| {
        ctx.blackboard.get(STOP).copied().unwrap_or(false)
    });
    NodeSpec::new(Selector)
        .child(NodeSpec::new(stop))
        .child(mover.spec())
}

#[test]
fn running_node_is_closed_when_branch_stops_reaching_it() {
    let mover = Probe::new(BtStatus::Running);
    let mut h = Harness::new(make_tree(&mover));
    h.bb.set(TRACE_LOG, TraceLog::default());

    assert_eq!(h.step(), BtStatus::Running);
    assert_eq!(h.step(), BtStatus::Running);
    assert!(h.is_open(3));
    assert_eq!(mover.counts().starts, 1);
    assert_eq!(mover.counts().ends, 0);

    h.bb.set(STOP, true);
    assert_eq!(h.step(), BtStatus::Success);

    assert!(!h.is_open(3));
    assert_eq!(h.status(3), Some(BtStatus::Failure));
    assert_eq!(mover.counts().ends, 1);

    let log = h.bb.get(TRACE_LOG).expect("trace log installed");
    let closed: Vec<_> = log.with_tag("bt.node.force_close").collect();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].node, Some(3));
    assert_eq!(closed[0].tick, 2);
}

#[test]
fn force_closed_node_is_not_closed_again_on_later_ticks() {
    let mover = Probe::new(BtStatus::Running);
    let mut h = Harness::new(make_tree(&mover));

    h.step();
    h.bb.set(STOP, true);
    h.step();
    h.step();
    h.step();

    assert_eq!(mover.counts().ends, 1);
    assert_eq!(h.status(3), Some(BtStatus::Failure));
}

#[test]
fn interrupted_node_restarts_when_reached_again() {
    let mover = Probe::new(BtStatus::Running);
    let mut h = Harness::new(make_tree(&mover));

    h.step();
    h.bb.set(STOP, true);
    h.step();
    h.bb.set(STOP, false);
    h.step();

    assert_eq!(mover.counts().starts, 2);
    assert!(h.is_open(3));
    assert_eq!(h.status(3), Some(BtStatus::Running));
}

#[test]
fn nested_running_nodes_are_all_closed() {
    let inner = Probe::new(BtStatus::Running);
    let stop = Condition::new(|ctx: &canopy_bt::BtContext<'_>| {
        ctx.blackboard.get(STOP).copied().unwrap_or(false)
    });
    // root(0) -> selector(1) -> [stop?(2), sequence(3) -> [inner(4)]]
    let mut h = Harness::new(
        NodeSpec::new(Selector)
            .child(NodeSpec::new(stop))
            .child(NodeSpec::new(Sequence).child(inner.spec())),
    );

    h.step();
    assert!(h.is_open(3) && h.is_open(4));

    h.bb.set(STOP, true);
    h.step();

    assert!(!h.is_open(3) && !h.is_open(4));
    assert_eq!(h.status(3), Some(BtStatus::Failure));
    assert_eq!(h.status(4), Some(BtStatus::Failure));
    assert_eq!(inner.counts().ends, 1);
}

#[test]
fn halt_closes_every_open_node_once() {
    let mover = Probe::new(BtStatus::Running);
    let mut h = Harness::new(make_tree(&mover));
    h.bb.set(TRACE_LOG, TraceLog::default());
    h.step();

    let ctx = h.ctx();
    h.tree.halt(&ctx, &mut h.bb);
    h.tree.halt(&ctx, &mut h.bb);

    assert_eq!(mover.counts().ends, 1);
    assert!(h.tree.snapshot().open_nodes().next().is_none());
    assert_eq!(h.tree.last_status(), None);
    let log = h.bb.get(TRACE_LOG).expect("trace log installed");
    assert_eq!(log.with_tag("bt.tree.halt").count(), 2);

    // A halted tree starts over on the next tick.
    assert_eq!(h.step(), BtStatus::Running);
    assert_eq!(mover.counts().starts, 2);
}

#[test]
fn halt_before_activation_is_a_no_op() {
    let mover = Probe::new(BtStatus::Running);
    let mut tree = BTree::new(make_tree(&mover));
    let mut bb = Blackboard::new();

    tree.halt(&TickContext::new(0, 0.1), &mut bb);

    assert_eq!(mover.counts(), Default::default());
    assert!(bb.is_empty());
}

#[test]
fn reset_closes_nodes_abandoned_by_an_erroring_tick() {
    let guard = Probe::new(BtStatus::Failure);
    let mover = Probe::new(BtStatus::Running);
    // root(0) -> selector(1) -> [guard(2), mover(3)]
    let mut h = Harness::new(NodeSpec::new(Selector).children([guard.spec(), mover.spec()]));

    assert_eq!(h.step(), BtStatus::Running);
    guard.set(BtStatus::Error);
    assert_eq!(h.step(), BtStatus::Error);
    assert!(h.tree.is_errored());

    let ctx = h.ctx();
    h.tree.reset(&ctx, &mut h.bb);

    assert!(!h.is_open(3));
    assert_eq!(h.status(3), Some(BtStatus::Failure));
    assert_eq!(mover.counts().ends, 1);
    assert!(h.tree.snapshot().open_nodes().next().is_none());

    guard.set(BtStatus::Failure);
    assert_eq!(h.step(), BtStatus::Running);
    assert_eq!(mover.counts().starts, 2);
    assert_eq!(mover.counts().ends, 1);
}
