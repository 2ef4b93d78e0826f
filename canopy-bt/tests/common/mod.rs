#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canopy_bt::{BTree, BtContext, BtNode, BtStatus, Children, NodeSpec};
use canopy_core::{Blackboard, TickContext};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub starts: u32,
    pub ticks: u32,
    pub ends: u32,
}

/// Leaf whose status is scripted from the test and which counts its hook calls.
#[derive(Clone)]
pub struct Probe {
    status: Rc<Cell<BtStatus>>,
    counts: Rc<RefCell<Counts>>,
}

impl Probe {
    pub fn new(status: BtStatus) -> Self {
        Self {
            status: Rc::new(Cell::new(status)),
            counts: Rc::default(),
        }
    }

    pub fn set(&self, status: BtStatus) {
        self.status.set(status);
    }

    pub fn counts(&self) -> Counts {
        *self.counts.borrow()
    }

    pub fn ticks(&self) -> u32 {
        self.counts().ticks
    }

    pub fn node(&self) -> Box<dyn BtNode> {
        Box::new(ProbeNode(self.clone()))
    }

    pub fn spec(&self) -> NodeSpec {
        NodeSpec::from_boxed(self.node())
    }
}

struct ProbeNode(Probe);

impl BtNode for ProbeNode {
    fn name(&self) -> &'static str {
        "Probe"
    }

    fn on_start(&mut self, _ctx: &mut BtContext<'_>) {
        self.0.counts.borrow_mut().starts += 1;
    }

    fn tick(&mut self, _children: &mut Children<'_, '_>, _ctx: &mut BtContext<'_>) -> BtStatus {
        self.0.counts.borrow_mut().ticks += 1;
        self.0.status.get()
    }

    fn on_end(&mut self, _ctx: &mut BtContext<'_>) {
        self.0.counts.borrow_mut().ends += 1;
    }
}

pub fn probes(statuses: &[BtStatus]) -> Vec<Probe> {
    statuses.iter().map(|s| Probe::new(*s)).collect()
}

pub fn specs(probes: &[Probe]) -> Vec<NodeSpec> {
    probes.iter().map(Probe::spec).collect()
}

/// Drives a tree with a fixed `dt` and an incrementing tick counter.
pub struct Harness {
    pub tree: BTree,
    pub bb: Blackboard,
    pub tick: u64,
}

impl Harness {
    pub fn new(root: NodeSpec) -> Self {
        Self::from_tree(BTree::new(root))
    }

    pub fn from_tree(mut tree: BTree) -> Self {
        let mut bb = Blackboard::new();
        tree.initialize_for_agent(1u64, &mut bb)
            .expect("fresh tree");
        Self { tree, bb, tick: 0 }
    }

    pub fn step(&mut self) -> BtStatus {
        self.step_dt(0.1)
    }

    pub fn step_dt(&mut self, dt: f32) -> BtStatus {
        let ctx = TickContext::new(self.tick, dt);
        self.tick += 1;
        self.tree.tick(&ctx, &mut self.bb)
    }

    pub fn ctx(&self) -> TickContext {
        TickContext::new(self.tick, 0.1)
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.tree.node(index).map(|n| n.is_open).unwrap_or(false)
    }

    pub fn status(&self, index: usize) -> Option<BtStatus> {
        self.tree.node(index).and_then(|n| n.status)
    }
}
