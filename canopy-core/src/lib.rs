//! Deterministic, engine-agnostic primitives for the canopy behavior tree runtime.
//!
//! This crate owns everything a tree needs from its surroundings: the per-agent
//! [`Blackboard`], the [`TickContext`] handed to every evaluation, deterministic RNG streams,
//! and the [`Brain`] that drives several [`Policy`] implementations for one agent.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod brain;
pub mod policy;
pub mod rng;
pub mod status;
pub mod tick;

pub use agent::AgentId;
pub use blackboard::{BbKey, Blackboard, BlackboardError};
pub use brain::{tick_brains, Brain, BrainConfig};
pub use policy::Policy;
pub use rng::{DeterministicRng, SplitMix64};
pub use status::Status;
pub use tick::TickContext;
