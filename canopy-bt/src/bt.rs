use canopy_core::rng::mix64;
use canopy_core::{Blackboard, SplitMix64, TickContext};

use crate::param::{ParamError, ParamValue};
use crate::tree::{Engine, TreeId};

/// Node status; the same type the [`Brain`](canopy_core::Brain) sees from a whole tree.
pub use canopy_core::Status as BtStatus;

/// What a node learns about itself when its tree is activated for an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub tree: TreeId,
    pub agent: u64,
    pub index: usize,
}

/// Node-specific behavior. The tree wraps every `BtNode` with the open/close bookkeeping, so
/// implementations only describe what happens on start, on each visit, and on end.
pub trait BtNode: 'static {
    /// Type tag, as used by the [`Registry`](crate::Registry).
    fn name(&self) -> &'static str;

    /// Apply one node parameter. Called at load time only.
    fn set_param(&mut self, param: &str, _value: &ParamValue) -> Result<(), ParamError> {
        Err(ParamError::unknown(self.name(), param))
    }

    /// Called once per activation, before the first tick.
    fn init(&mut self, _binding: &Binding, _blackboard: &mut Blackboard) {}

    /// Called on the Closed → Open transition only, not on repeated `Running` visits.
    fn on_start(&mut self, _ctx: &mut BtContext<'_>) {}

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus;

    /// Called on every transition to Closed, including force-closes by the tree.
    fn on_end(&mut self, _ctx: &mut BtContext<'_>) {}
}

/// Per-evaluation view of the world handed to nodes.
pub struct BtContext<'a> {
    pub tick: &'a TickContext,
    pub blackboard: &'a mut Blackboard,
    tree: TreeId,
    agent: u64,
    node: usize,
    now: f64,
    /// RNG draws so far this tick.
    draws: u64,
}

impl<'a> BtContext<'a> {
    pub(crate) fn new(
        tick: &'a TickContext,
        blackboard: &'a mut Blackboard,
        tree: TreeId,
        agent: u64,
        now: f64,
    ) -> Self {
        Self {
            tick,
            blackboard,
            tree,
            agent,
            node: 0,
            now,
            draws: 0,
        }
    }

    pub fn tree(&self) -> TreeId {
        self.tree
    }

    pub fn agent(&self) -> u64 {
        self.agent
    }

    /// Index of the node currently being evaluated (or closed).
    pub fn node(&self) -> usize {
        self.node
    }

    /// Tree time in seconds at the start of this tick (sum of all previous `dt_seconds`).
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn dt_seconds(&self) -> f32 {
        self.tick.dt_seconds
    }

    /// Deterministic RNG unique to this tree, node, agent and tick.
    ///
    /// Every call within a tick yields a fresh stream, so a node evaluated several times in one
    /// traversal (e.g. under [`RepeatTimes`](crate::RepeatTimes)) does not repeat its draws.
    /// Replays with the same seed see the same sequence.
    pub fn rng(&mut self, stream: u64) -> SplitMix64 {
        let draw = self.draws;
        self.draws += 1;
        let node_key = ((self.tree.0 as u64) << 32) | self.node as u64;
        let stream = mix64(node_key ^ mix64(stream)) ^ mix64(self.tick.tick ^ mix64(draw));
        self.tick.rng(self.agent, stream)
    }

    pub(crate) fn enter(&mut self, node: usize) -> usize {
        std::mem::replace(&mut self.node, node)
    }

    pub(crate) fn leave(&mut self, parent: usize) {
        self.node = parent;
    }
}

/// Handle through which a node evaluates its children, addressed by position.
pub struct Children<'e, 'g> {
    ids: &'g [usize],
    engine: &'e mut Engine<'g>,
}

impl<'e, 'g> Children<'e, 'g> {
    pub(crate) fn new(ids: &'g [usize], engine: &'e mut Engine<'g>) -> Self {
        Self { ids, engine }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Tree index of the child at `position`.
    pub fn index_of(&self, position: usize) -> Option<usize> {
        self.ids.get(position).copied()
    }

    /// Evaluate the child at `position`. An out-of-range position is a structural error.
    pub fn evaluate(&mut self, position: usize, ctx: &mut BtContext<'_>) -> BtStatus {
        match self.ids.get(position) {
            Some(&index) => self.engine.evaluate(index, ctx),
            None => BtStatus::Error,
        }
    }
}
