//! Evaluation observers.

use std::sync::Arc;

use vela_ir::NodeId;
use vela_value::Value;

use super::{DecorateError, Decorator};
use crate::activation::Activation;
use crate::node::{Node, Observer, WatchNode};

/// Wraps every node in a [`WatchNode`] reporting to one observer.
///
/// The observer is called once per evaluation of each wrapped node, with the
/// node's id and value, after the value is computed. Children therefore
/// report before their parents.
#[derive(Clone)]
pub struct ObserveEval {
    observer: Observer,
}

impl ObserveEval {
    pub fn new(observer: impl Fn(NodeId, &Value) + Send + Sync + 'static) -> Self {
        ObserveEval {
            observer: Arc::new(observer),
        }
    }

    /// Share an existing observer.
    pub fn from_observer(observer: Observer) -> Self {
        ObserveEval { observer }
    }
}

/// Shorthand for [`ObserveEval::new`].
pub fn observe_eval(observer: impl Fn(NodeId, &Value) + Send + Sync + 'static) -> ObserveEval {
    ObserveEval::new(observer)
}

impl Decorator for ObserveEval {
    fn decorate(&self, node: Node) -> Result<Node, DecorateError> {
        Ok(Node::Watch(WatchNode::new(node, Arc::clone(&self.observer))))
    }
}

impl std::fmt::Debug for ObserveEval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserveEval").finish_non_exhaustive()
    }
}

pub(crate) fn eval_watch(node: &WatchNode, activation: &dyn Activation) -> Value {
    let value = node.inner.evaluate(activation);
    (node.observer)(node.inner.id(), &value);
    value
}
