#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AgentId, Blackboard, Policy, Status, TickContext};

/// How often a brain re-evaluates its policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrainConfig {
    pub think_every_ticks: u32,
    pub think_offset_ticks: u32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            think_every_ticks: 1,
            think_offset_ticks: 0,
        }
    }
}

impl BrainConfig {
    /// Spread agents that think every `think_every_ticks` over distinct ticks.
    pub fn deterministic(agent: impl AgentId, think_every_ticks: u32) -> Self {
        let every = think_every_ticks.max(1);
        let offset = (agent.stable_id() % (every as u64)) as u32;
        Self {
            think_every_ticks: every,
            think_offset_ticks: offset,
        }
    }

    pub fn should_think(&self, tick: u64) -> bool {
        let every = self.think_every_ticks.max(1) as u64;
        ((tick + (self.think_offset_ticks as u64)) % every) == 0
    }
}

/// One agent: its blackboard plus the policies (trees) evaluated on its behalf.
///
/// Initialisation happens in three steps: build the brain, seed the blackboard, then
/// [`activate`](Brain::activate) (or let the first [`tick`](Brain::tick) do it). Policies are
/// evaluated sequentially in insertion order and share the blackboard.
pub struct Brain<A>
where
    A: AgentId,
{
    pub agent: A,
    pub config: BrainConfig,
    pub blackboard: Blackboard,
    policies: Vec<Box<dyn Policy>>,
    activated: bool,
}

impl<A> Brain<A>
where
    A: AgentId,
{
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            config: BrainConfig::default(),
            blackboard: Blackboard::new(),
            policies: Vec::new(),
            activated: false,
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn Policy>) -> Self {
        self.add_policy(policy);
        self
    }

    /// Policies added after activation are activated immediately.
    pub fn add_policy(&mut self, mut policy: Box<dyn Policy>) {
        policy.assign_slot(self.policies.len());
        if self.activated {
            policy.activate(self.agent.stable_id(), &mut self.blackboard);
        }
        self.policies.push(policy);
    }

    pub fn policies(&self) -> &[Box<dyn Policy>] {
        &self.policies
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn activate(&mut self) {
        if self.activated {
            return;
        }
        let agent = self.agent.stable_id();
        for policy in self.policies.iter_mut() {
            policy.activate(agent, &mut self.blackboard);
        }
        self.activated = true;
    }

    pub fn tick(&mut self, ctx: &TickContext) {
        if !self.config.should_think(ctx.tick) {
            return;
        }
        self.activate();
        for policy in self.policies.iter_mut() {
            if !policy.is_halted() {
                policy.tick(ctx, &mut self.blackboard);
            }
        }
    }

    /// Tick a single policy by name, ignoring the think cadence, and return its status.
    ///
    /// An unknown name or a halted policy yields [`Status::Error`] without ticking anything.
    pub fn run_policy(&mut self, name: &str, ctx: &TickContext) -> Status {
        self.activate();
        let Some(policy) = self.policies.iter_mut().find(|p| p.name() == name) else {
            return Status::Error;
        };
        if policy.is_halted() {
            return Status::Error;
        }
        policy.tick(ctx, &mut self.blackboard)
    }
}

/// Tick every brain in stable agent order.
pub fn tick_brains<A>(ctx: &TickContext, brains: &mut [Brain<A>])
where
    A: AgentId,
{
    brains.sort_by_key(|b| b.agent.stable_id());
    for brain in brains.iter_mut() {
        brain.tick(ctx);
    }
}
