#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{rng, AgentId, SplitMix64};

/// Per-tick input supplied by whatever drives the trees (usually once per frame).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickContext {
    pub tick: u64,
    /// Seconds elapsed since the previous tick; consumed by time-based decorators.
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        self.rng(agent.stable_id(), stream)
    }

    /// RNG stream keyed by a raw agent id; identical inputs always yield the same stream.
    pub fn rng(&self, agent_id: u64, stream: u64) -> SplitMix64 {
        SplitMix64::new(rng::derive_seed(self.seed, agent_id, stream))
    }
}
