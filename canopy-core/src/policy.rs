use crate::{Blackboard, Status, TickContext};

/// Decision logic driven by a [`Brain`](crate::Brain), typically one behavior tree.
pub trait Policy: 'static {
    /// Name used by [`Brain::run_policy`](crate::Brain::run_policy).
    fn name(&self) -> &str;

    /// Bind the policy to its agent. Called once, after the host has seeded the blackboard.
    fn activate(&mut self, agent: u64, blackboard: &mut Blackboard);

    fn tick(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status;

    /// Position of the policy within its brain, assigned before activation. Trees use it as a
    /// default id so sibling trees get distinct RNG streams and trace ids.
    fn assign_slot(&mut self, _slot: usize) {}

    /// Halted policies are skipped by the brain (e.g. a tree that errored out).
    fn is_halted(&self) -> bool {
        false
    }
}
