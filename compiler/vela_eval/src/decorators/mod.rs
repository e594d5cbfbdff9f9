//! Tree rewriting.
//!
//! A [`Decorator`] takes a node and returns its replacement, or rejects it.
//! A [`Pipeline`] applies an ordered list of decorators to every node of a
//! tree, bottom-up: a node's children are fully decorated before any
//! decorator sees the node itself, and at each node the decorators run in
//! list order, each receiving the previous one's output.
//!
//! Built-in decorators:
//! - [`ObserveEval`] wraps nodes so an observer sees every computed value
//! - [`DisableShortCircuits`] swaps short-circuit forms for exhaustive twins
//! - [`Optimize`] folds constant literals and plans hash-based `in` tests

pub(crate) mod exhaustive;
pub(crate) mod observe;
pub(crate) mod optimize;

pub use exhaustive::DisableShortCircuits;
pub use observe::{observe_eval, ObserveEval};
pub use optimize::Optimize;

use std::fmt;

use vela_ir::NodeId;

use crate::node::Node;
use crate::stack::ensure_sufficient_stack;

/// Why a tree could not be decorated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecorateError {
    #[error("map {id} has {keys} keys but {vals} values")]
    MapArity { id: NodeId, keys: usize, vals: usize },

    #[error("membership test {id} expects a list operand, found {type_name}")]
    NotAList { id: NodeId, type_name: &'static str },

    #[error("node {id} rejected: {reason}")]
    Rejected { id: NodeId, reason: String },
}

impl DecorateError {
    /// Rejection raised by a caller-supplied decorator.
    #[cold]
    pub fn rejected(id: NodeId, reason: impl Into<String>) -> Self {
        DecorateError::Rejected {
            id,
            reason: reason.into(),
        }
    }
}

/// A node-to-node rewrite.
pub trait Decorator {
    fn decorate(&self, node: Node) -> Result<Node, DecorateError>;
}

impl<F> Decorator for F
where
    F: Fn(Node) -> Result<Node, DecorateError>,
{
    fn decorate(&self, node: Node) -> Result<Node, DecorateError> {
        self(node)
    }
}

/// Ordered list of decorators applied bottom-up over a tree.
#[derive(Default)]
pub struct Pipeline {
    decorators: Vec<Box<dyn Decorator>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decorator; it runs after every decorator already added.
    pub fn push(&mut self, decorator: impl Decorator + 'static) {
        self.decorators.push(Box::new(decorator));
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, decorator: impl Decorator + 'static) -> Self {
        self.push(decorator);
        self
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Decorate every node of `tree`.
    ///
    /// Malformed nodes are rejected before any decorator sees them. The
    /// first error aborts the whole pass.
    #[tracing::instrument(level = "debug", skip_all, fields(decorators = self.len()))]
    pub fn apply(&self, tree: Node) -> Result<Node, DecorateError> {
        let result = self.rebuild(tree);
        if let Err(err) = &result {
            tracing::debug!(%err, "decoration failed");
        }
        result
    }

    fn rebuild(&self, node: Node) -> Result<Node, DecorateError> {
        ensure_sufficient_stack(|| {
            let node = node.try_map_children(|child| self.rebuild(child))?;
            validate(&node)?;
            self.decorators
                .iter()
                .try_fold(node, |node, decorator| decorator.decorate(node))
        })
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("decorators", &self.decorators.len())
            .finish()
    }
}

/// Structural checks the tree builders cannot enforce.
fn validate(node: &Node) -> Result<(), DecorateError> {
    match node {
        Node::Map(map) if map.keys.len() != map.vals.len() => Err(DecorateError::MapArity {
            id: map.id,
            keys: map.keys.len(),
            vals: map.vals.len(),
        }),
        _ => Ok(()),
    }
}
