use thiserror::Error;

/// Lifecycle misuse of a [`BTree`](crate::BTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BtError {
    #[error("tree is already bound to agent {agent}")]
    AlreadyInitialized { agent: u64 },

    #[error("tree has not been initialised for an agent")]
    NotInitialized,

    #[error("tree errored out and must be reset before ticking again")]
    Errored,
}
