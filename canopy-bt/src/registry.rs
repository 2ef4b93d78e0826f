//! Data-driven tree construction.
//!
//! A [`TreeDesc`] names node types by string tag; the [`Registry`] maps each tag to a factory
//! producing a default-constructed node, then applies the description's parameters through
//! [`BtNode::set_param`]. Reading descriptions from files is left to the host (enable the `serde`
//! feature to derive the usual traits).

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bt::BtNode;
use crate::nodes::{
    CheckBool, Inverse, Log, Parallel, RandomCondition, RandomSelector, RepeatTimes, Root,
    RunTillFail, Selector, SelectorMemory, Sequence, SequenceMemory, WaitForSeconds,
};
use crate::param::{ParamError, ParamValue};
use crate::tree::{BTree, NodeSpec, TreeId};

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeDesc {
    /// Registry tag, e.g. `"Sequence"`.
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: BTreeMap<String, ParamValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<NodeDesc>,
}

impl NodeDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: NodeDesc) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeDesc>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeDesc {
    pub name: String,
    /// Tree id; when absent, a brain assigns the tree's slot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<u32>,
    pub root: NodeDesc,
}

impl TreeDesc {
    pub fn new(name: impl Into<String>, root: NodeDesc) -> Self {
        Self {
            name: name.into(),
            id: None,
            root,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("unresolved node types: {}", .0.join(", "))]
    UnresolvedNodeTypes(Vec<String>),

    /// `position` is the node's pre-order position within the description.
    #[error("node `{node}` at position {position}: {source}")]
    Param {
        node: String,
        position: usize,
        source: ParamError,
    },
}

pub type NodeFactory = Box<dyn Fn() -> Box<dyn BtNode>>;

/// Maps type tags to node factories.
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, NodeFactory>,
}

impl Registry {
    /// An empty registry; see [`with_builtins`](Registry::with_builtins).
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that knows every node type shipped with this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_default::<Root>(Root::NAME)
            .register_default::<Sequence>(Sequence::NAME)
            .register_default::<Selector>(Selector::NAME)
            .register_default::<SelectorMemory>(SelectorMemory::NAME)
            .register_default::<SequenceMemory>(SequenceMemory::NAME)
            .register_default::<Parallel>(Parallel::NAME)
            .register_default::<RandomSelector>(RandomSelector::NAME)
            .register_default::<Inverse>(Inverse::NAME)
            .register_default::<RepeatTimes>(RepeatTimes::NAME)
            .register_default::<RunTillFail>(RunTillFail::NAME)
            .register_default::<WaitForSeconds>(WaitForSeconds::NAME)
            .register_default::<RandomCondition>(RandomCondition::NAME)
            .register_default::<Log>(Log::NAME)
            .register_default::<CheckBool>(CheckBool::NAME);
        registry
    }

    /// Register (or replace) the factory for `tag`.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        factory: impl Fn() -> Box<dyn BtNode> + 'static,
    ) -> &mut Self {
        self.factories.insert(tag.into(), Box::new(factory));
        self
    }

    pub fn register_default<N>(&mut self, tag: impl Into<String>) -> &mut Self
    where
        N: BtNode + Default,
    {
        self.register(tag, || Box::new(N::default()))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a tree from `desc`. Either every node resolves and accepts its parameters, or
    /// nothing is built.
    pub fn load(&self, desc: &TreeDesc) -> Result<BTree, LoadError> {
        let mut unresolved = Vec::new();
        self.collect_unresolved(&desc.root, &mut unresolved);
        if !unresolved.is_empty() {
            for tag in &unresolved {
                tracing::error!(tree = %desc.name, tag = %tag, "cannot find node type");
            }
            return Err(LoadError::UnresolvedNodeTypes(unresolved));
        }

        let mut position = 0;
        let root = self.build(&desc.root, &mut position).inspect_err(|err| {
            tracing::error!(tree = %desc.name, %err, "failed to load tree");
        })?;
        let tree = BTree::new(root).with_name(desc.name.clone());
        Ok(match desc.id {
            Some(id) => tree.with_id(TreeId(id)),
            None => tree,
        })
    }

    fn collect_unresolved(&self, desc: &NodeDesc, out: &mut Vec<String>) {
        if !self.contains(&desc.name) && !out.contains(&desc.name) {
            out.push(desc.name.clone());
        }
        for child in &desc.children {
            self.collect_unresolved(child, out);
        }
    }

    fn build(&self, desc: &NodeDesc, position: &mut usize) -> Result<NodeSpec, LoadError> {
        let here = *position;
        *position += 1;

        let factory = self
            .factories
            .get(&desc.name)
            .ok_or_else(|| LoadError::UnresolvedNodeTypes(vec![desc.name.clone()]))?;
        let mut node = factory();
        for (param, value) in &desc.params {
            node.set_param(param, value)
                .map_err(|source| LoadError::Param {
                    node: desc.name.clone(),
                    position: here,
                    source,
                })?;
        }

        let mut spec = NodeSpec::from_boxed(node);
        for child in &desc.children {
            spec = spec.child(self.build(child, position)?);
        }
        Ok(spec)
    }
}
