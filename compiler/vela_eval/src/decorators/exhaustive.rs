//! Exhaustive evaluation.
//!
//! [`DisableShortCircuits`] replaces `||`, `&&`, the ternary, and folds with
//! twins that evaluate every operand. Results are unchanged: only the set of
//! nodes visited grows, which matters when an observer is recording state.

use vela_value::{no_such_overload, Value};

use super::{DecorateError, Decorator};
use crate::activation::Activation;
use crate::eval::{logical_and, logical_or};
use crate::node::{ConditionalNode, LogicalNode, Node};

/// Swaps short-circuit nodes for their exhaustive twins.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisableShortCircuits;

impl Decorator for DisableShortCircuits {
    fn decorate(&self, node: Node) -> Result<Node, DecorateError> {
        if matches!(
            node,
            Node::Or(_) | Node::And(_) | Node::Conditional(_) | Node::Fold(_)
        ) {
            tracing::trace!(id = %node.id(), kind = node.kind(), "disabled short circuit");
        }
        Ok(match node {
            Node::Or(n) => Node::ExhaustiveOr(n),
            Node::And(n) => Node::ExhaustiveAnd(n),
            Node::Conditional(n) => Node::ExhaustiveConditional(n),
            Node::Fold(n) => Node::ExhaustiveFold(n),
            other => other,
        })
    }
}

pub(crate) fn eval_or(node: &LogicalNode, activation: &dyn Activation) -> Value {
    let lhs = node.lhs.evaluate(activation);
    let rhs = node.rhs.evaluate(activation);
    logical_or(lhs, rhs)
}

pub(crate) fn eval_and(node: &LogicalNode, activation: &dyn Activation) -> Value {
    let lhs = node.lhs.evaluate(activation);
    let rhs = node.rhs.evaluate(activation);
    logical_and(lhs, rhs)
}

pub(crate) fn eval_conditional(node: &ConditionalNode, activation: &dyn Activation) -> Value {
    let cond = node.cond.evaluate(activation);
    let truthy = node.truthy.evaluate(activation);
    let falsy = node.falsy.evaluate(activation);
    match cond {
        Value::Bool(true) => truthy,
        Value::Bool(false) => falsy,
        other => other.or_error(no_such_overload),
    }
}
