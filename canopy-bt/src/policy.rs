use canopy_core::{Blackboard, Policy, Status, TickContext};

use crate::tree::BTree;

/// Lets a [`Brain`](canopy_core::Brain) drive the tree. An errored tree reports itself halted
/// until it is [`reset`](BTree::reset).
impl Policy for BTree {
    fn name(&self) -> &str {
        BTree::name(self)
    }

    fn activate(&mut self, agent: u64, blackboard: &mut Blackboard) {
        if let Err(err) = self.initialize_for_agent(agent, blackboard) {
            tracing::warn!(tree = %BTree::name(self), %err, "activation ignored");
        }
    }

    fn tick(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        BTree::tick(self, ctx, blackboard)
    }

    fn assign_slot(&mut self, slot: usize) {
        self.assign_default_id(slot);
    }

    fn is_halted(&self) -> bool {
        self.is_errored()
    }
}
