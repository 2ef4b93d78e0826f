#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of evaluating a policy or one of its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Success,
    Failure,
    Running,
    /// Never retried; closes the node and aborts every composite on the way up.
    Error,
}

impl Status {
    pub fn is_running(self) -> bool {
        self == Status::Running
    }

    /// Swap `Success` and `Failure`; `Running` and `Error` pass through.
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }
}
