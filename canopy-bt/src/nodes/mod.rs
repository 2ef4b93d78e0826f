//! Built-in node types.
//!
//! Every composite and decorator treats an empty child list as a malformed tree and returns
//! [`BtStatus::Error`](crate::BtStatus::Error) on its first evaluation.

mod composite;
mod decorator;
mod leaf;

pub use composite::{Parallel, RandomSelector, Selector, SelectorMemory, Sequence, SequenceMemory};
pub use decorator::{Inverse, RepeatTimes, Root, RunTillFail, WaitForSeconds};
pub use leaf::{Action, CheckBool, Condition, Log, RandomCondition};
