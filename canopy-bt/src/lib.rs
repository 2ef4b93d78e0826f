//! Behavior tree runtime built on `canopy-core`.
//!
//! A [`BTree`] owns its nodes in a flat pre-order arena. Each tick runs one depth-first
//! traversal from the root; nodes that were left `Running` by the previous tick but are not
//! reached again are force-closed (their `on_end` runs and their status drops to `Failure`), so
//! long-running actions never stay open after their branch is abandoned.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod debug;
pub mod error;
pub mod nodes;
pub mod param;
pub mod policy;
pub mod registry;
pub mod tree;

pub use bt::{Binding, BtContext, BtNode, BtStatus, Children};
pub use debug::{NodeSnapshot, TreeObserver, TreeSnapshot};
pub use error::BtError;
pub use nodes::{
    Action, CheckBool, Condition, Inverse, Log, Parallel, RandomCondition, RandomSelector,
    RepeatTimes, Root, RunTillFail, Selector, SelectorMemory, Sequence, SequenceMemory,
    WaitForSeconds,
};
pub use param::{ParamError, ParamValue};
pub use registry::{LoadError, NodeDesc, NodeFactory, Registry, TreeDesc};
pub use tree::{BTree, NodeSpec, TreeId, ROOT};
