use core::fmt::Debug;

/// Stable identifier for the agent a tree runs on behalf of.
///
/// Trees only ever see the numeric [`stable_id`](AgentId::stable_id): it seeds per-node RNG
/// streams and tags log lines, so it must not change for the lifetime of the agent.
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

macro_rules! impl_agent_id {
    ($($ty:ty),*) => {
        $(
            impl AgentId for $ty {
                fn stable_id(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_agent_id!(u8, u16, u32, u64, usize);
