use canopy_core::{AgentId, Blackboard, TickContext};
use canopy_trace::{emit as trace_emit, TraceEvent};

use crate::bt::{Binding, BtContext, BtNode, BtStatus, Children};
use crate::debug::{NodeSnapshot, TreeObserver, TreeSnapshot};
use crate::error::BtError;
use crate::nodes::Root;

/// Index of the root node in every tree.
pub const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TreeId(pub u32);

/// A node plus its children, before the tree assigns indices.
pub struct NodeSpec {
    node: Box<dyn BtNode>,
    children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(node: impl BtNode) -> Self {
        Self::from_boxed(Box::new(node))
    }

    pub fn from_boxed(node: Box<dyn BtNode>) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn name(&self) -> &'static str {
        self.node.name()
    }
}

pub(crate) struct NodeState {
    /// Taken out while the node is being evaluated.
    node: Option<Box<dyn BtNode>>,
    name: &'static str,
    status: Option<BtStatus>,
    is_open: bool,
}

impl NodeState {
    fn new(node: Box<dyn BtNode>) -> Self {
        Self {
            name: node.name(),
            node: Some(node),
            status: None,
            is_open: false,
        }
    }
}

/// Borrowed view of a tree used for one traversal.
pub(crate) struct Engine<'g> {
    topology: &'g [Box<[usize]>],
    slots: &'g mut [NodeState],
    opened: &'g mut [bool],
}

impl<'g> Engine<'g> {
    pub(crate) fn evaluate(&mut self, index: usize, ctx: &mut BtContext<'_>) -> BtStatus {
        let Some(mut node) = self.slots[index].node.take() else {
            tracing::error!(
                tree = ctx.tree().0,
                node = index,
                "node re-entered while already being evaluated"
            );
            return BtStatus::Error;
        };
        let parent = ctx.enter(index);

        let was_open = self.slots[index].is_open;
        self.slots[index].is_open = true;
        self.opened[index] = true;
        if !was_open {
            node.on_start(ctx);
        }

        let topology = self.topology;
        let status = node.tick(&mut Children::new(&topology[index], self), ctx);

        if status == BtStatus::Error {
            tracing::error!(
                tree = ctx.tree().0,
                agent = ctx.agent(),
                node = index,
                name = node.name(),
                "node returned error"
            );
        }
        if status != BtStatus::Running {
            self.slots[index].is_open = false;
            node.on_end(ctx);
        }

        let slot = &mut self.slots[index];
        slot.status = Some(status);
        slot.node = Some(node);
        ctx.leave(parent);
        status
    }
}

/// Close an open node from the outside. Returns whether anything changed.
fn force_close(slot: &mut NodeState, index: usize, ctx: &mut BtContext<'_>) -> bool {
    if !slot.is_open {
        return false;
    }
    slot.is_open = false;
    if let Some(node) = slot.node.as_mut() {
        let parent = ctx.enter(index);
        node.on_end(ctx);
        ctx.leave(parent);
    }
    // An interrupted action cannot be assumed to have succeeded.
    if slot.status == Some(BtStatus::Running) {
        slot.status = Some(BtStatus::Failure);
    }
    true
}

/// A behavior tree: one root, its nodes in a flat pre-order arena, and the per-tick open tables
/// used to close branches that were abandoned mid-flight.
pub struct BTree {
    id: TreeId,
    /// Set by [`BTree::with_id`]; a brain-assigned default never overrides it.
    explicit_id: bool,
    name: String,
    topology: Vec<Box<[usize]>>,
    slots: Vec<NodeState>,
    opened_this_tick: Vec<bool>,
    opened_last_tick: Vec<bool>,
    last: Option<BtStatus>,
    errored: bool,
    agent: Option<u64>,
    clock: f64,
    observers: Vec<Box<dyn TreeObserver>>,
}

impl BTree {
    /// Build a tree from `root`. Anything other than a [`Root`] node is wrapped in one.
    pub fn new(root: NodeSpec) -> Self {
        let root = if root.name() == Root::NAME {
            root
        } else {
            NodeSpec::new(Root).child(root)
        };

        let mut topology = Vec::new();
        let mut slots = Vec::new();
        flatten(root, &mut topology, &mut slots);

        let count = slots.len();
        Self {
            id: TreeId::default(),
            explicit_id: false,
            name: String::from("tree"),
            topology,
            slots,
            opened_this_tick: vec![false; count],
            opened_last_tick: vec![false; count],
            last: None,
            errored: false,
            agent: None,
            clock: 0.0,
            observers: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_id(mut self, id: TreeId) -> Self {
        self.id = id;
        self.explicit_id = true;
        self
    }

    /// Use `slot` as the tree id unless one was set explicitly or the tree is already bound.
    pub(crate) fn assign_default_id(&mut self, slot: usize) {
        if self.explicit_id || self.is_initialized() {
            return;
        }
        match u32::try_from(slot) {
            Ok(slot) => self.id = TreeId(slot),
            Err(_) => tracing::warn!(tree = %self.name, slot, "policy slot does not fit a tree id"),
        }
    }

    pub fn with_observer(mut self, observer: impl TreeObserver + 'static) -> Self {
        self.add_observer(Box::new(observer));
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn TreeObserver>) {
        self.observers.push(observer);
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn children_of(&self, index: usize) -> &[usize] {
        self.topology.get(index).map(|c| &c[..]).unwrap_or(&[])
    }

    pub fn node(&self, index: usize) -> Option<NodeSnapshot> {
        let slot = self.slots.get(index)?;
        Some(NodeSnapshot {
            index,
            name: slot.name,
            status: slot.status,
            is_open: slot.is_open,
            visited: self.opened_last_tick[index],
        })
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            tree: self.id,
            status: self.last,
            errored: self.errored,
            elapsed_seconds: self.clock,
            nodes: (0..self.slots.len()).filter_map(|i| self.node(i)).collect(),
        }
    }

    pub fn last_status(&self) -> Option<BtStatus> {
        self.last
    }

    pub fn is_initialized(&self) -> bool {
        self.agent.is_some()
    }

    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// Tree time: the sum of `dt_seconds` over every completed tick.
    pub fn elapsed_seconds(&self) -> f64 {
        self.clock
    }

    /// Bind every node to this tree and `agent`. Must happen exactly once, before the first tick.
    pub fn initialize_for_agent<A: AgentId>(
        &mut self,
        agent: A,
        blackboard: &mut Blackboard,
    ) -> Result<(), BtError> {
        if let Some(bound) = self.agent {
            return Err(BtError::AlreadyInitialized { agent: bound });
        }
        let agent = agent.stable_id();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let binding = Binding {
                tree: self.id,
                agent,
                index,
            };
            if let Some(node) = slot.node.as_mut() {
                node.init(&binding, blackboard);
            }
        }
        self.agent = Some(agent);
        tracing::debug!(tree = %self.name, agent, nodes = self.slots.len(), "tree activated");
        Ok(())
    }

    /// Run one traversal. Refusals (not activated, errored) are logged and reported as `Error`.
    pub fn tick(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> BtStatus {
        match self.try_tick(ctx, blackboard) {
            Ok(status) => status,
            Err(err @ BtError::Errored) => {
                tracing::trace!(tree = %self.name, %err, "tick refused");
                BtStatus::Error
            }
            Err(err) => {
                tracing::warn!(tree = %self.name, %err, "tick refused");
                BtStatus::Error
            }
        }
    }

    pub fn try_tick(
        &mut self,
        ctx: &TickContext,
        blackboard: &mut Blackboard,
    ) -> Result<BtStatus, BtError> {
        let agent = self.agent.ok_or(BtError::NotInitialized)?;
        if self.errored {
            return Err(BtError::Errored);
        }

        self.opened_this_tick.fill(false);
        let mut bt_ctx = BtContext::new(ctx, blackboard, self.id, agent, self.clock);
        let status = Engine {
            topology: &self.topology,
            slots: &mut self.slots,
            opened: &mut self.opened_this_tick,
        }
        .evaluate(ROOT, &mut bt_ctx);

        if status == BtStatus::Error {
            self.errored = true;
            tracing::error!(tree = %self.name, agent, tick = ctx.tick, "behavior tree errored out");
            trace_emit(
                bt_ctx.blackboard,
                TraceEvent::new(ctx.tick, "bt.tree.error").with_tree(self.id.0),
            );
        } else {
            self.close_interrupted(&mut bt_ctx);
        }

        self.opened_last_tick.copy_from_slice(&self.opened_this_tick);
        self.last = Some(status);
        self.clock += f64::from(ctx.dt_seconds);
        self.notify_observers();
        Ok(status)
    }

    /// Force-close every open node. This is the only early termination path; the tree can be
    /// ticked again afterwards.
    ///
    /// This includes nodes abandoned by a tick that errored out, which skipped reconciliation.
    pub fn halt(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) {
        let Some(agent) = self.agent else {
            return;
        };
        let mut bt_ctx = BtContext::new(ctx, blackboard, self.id, agent, self.clock);
        let mut closed = 0usize;
        for index in 0..self.slots.len() {
            if force_close(&mut self.slots[index], index, &mut bt_ctx) {
                closed += 1;
            }
        }
        self.opened_last_tick.fill(false);
        self.last = None;
        tracing::debug!(tree = %self.name, closed, "tree halted");
        trace_emit(
            bt_ctx.blackboard,
            TraceEvent::new(ctx.tick, "bt.tree.halt").with_tree(self.id.0),
        );
    }

    /// Halt and clear the errored flag so the tree accepts ticks again.
    pub fn reset(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) {
        self.halt(ctx, blackboard);
        self.errored = false;
    }

    /// Close nodes that were open on the previous traversal but not reached on this one.
    fn close_interrupted(&mut self, ctx: &mut BtContext<'_>) {
        for index in 0..self.slots.len() {
            if !self.opened_last_tick[index] || self.opened_this_tick[index] {
                continue;
            }
            if force_close(&mut self.slots[index], index, ctx) {
                tracing::debug!(
                    tree = %self.name,
                    node = index,
                    name = self.slots[index].name,
                    "force-closed interrupted node"
                );
                trace_emit(
                    ctx.blackboard,
                    TraceEvent::new(ctx.tick.tick, "bt.node.force_close")
                        .with_tree(self.id.0)
                        .with_node(index),
                );
            }
        }
    }

    fn notify_observers(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in self.observers.iter_mut() {
            observer.on_tick(&snapshot);
        }
    }
}

fn flatten(spec: NodeSpec, topology: &mut Vec<Box<[usize]>>, slots: &mut Vec<NodeState>) -> usize {
    let index = slots.len();
    slots.push(NodeState::new(spec.node));
    topology.push(Box::default());
    let children: Vec<usize> = spec
        .children
        .into_iter()
        .map(|child| flatten(child, topology, slots))
        .collect();
    topology[index] = children.into_boxed_slice();
    index
}
