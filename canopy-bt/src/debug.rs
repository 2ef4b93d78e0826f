//! Read-only views of a tree for inspectors and debuggers.
//!
//! Observers are notified after every tick; nothing here feeds back into evaluation.

use crate::bt::BtStatus;
use crate::tree::TreeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub index: usize,
    pub name: &'static str,
    /// `None` until the node is evaluated for the first time.
    pub status: Option<BtStatus>,
    pub is_open: bool,
    /// Reached during the most recent traversal.
    pub visited: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    pub tree: TreeId,
    pub status: Option<BtStatus>,
    pub errored: bool,
    pub elapsed_seconds: f64,
    pub nodes: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    pub fn open_nodes(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.nodes.iter().filter(|n| n.is_open)
    }

    pub fn visited_nodes(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.nodes.iter().filter(|n| n.visited)
    }
}

pub trait TreeObserver {
    fn on_tick(&mut self, snapshot: &TreeSnapshot);
}

impl<F> TreeObserver for F
where
    F: FnMut(&TreeSnapshot),
{
    fn on_tick(&mut self, snapshot: &TreeSnapshot) {
        self(snapshot)
    }
}
