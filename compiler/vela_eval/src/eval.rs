//! Tree evaluation.
//!
//! `Node::evaluate` dispatches on the variant. Short-circuit forms live here;
//! the exhaustive twins, watch nodes, and set-membership nodes are evaluated
//! by the decorator modules that produce them.
//!
//! Evaluation is total: every failure is returned as `Value::Error`, and a
//! withheld input surfaces as `Value::Unknown`.

use vela_value::{
    duplicate_map_key, no_such_attribute, no_such_overload, not_iterable, unsupported_key_type,
    EvalError, MapValue, Value,
};

use crate::activation::Activation;
use crate::decorators::{exhaustive, observe, optimize};
use crate::node::{BinaryNode, ConditionalNode, FoldNode, IdentNode, ListNode, LogicalNode, MapNode, Node};
use crate::operators::evaluate_binary;
use crate::pool::ActivationPool;
use crate::stack::ensure_sufficient_stack;

impl Node {
    /// Evaluate this tree against `activation`.
    pub fn evaluate(&self, activation: &dyn Activation) -> Value {
        ensure_sufficient_stack(|| self.dispatch(activation))
    }

    fn dispatch(&self, activation: &dyn Activation) -> Value {
        match self {
            Node::Const(n) => n.value.clone(),
            Node::Ident(n) => n.evaluate(activation),
            Node::Binary(n) => n.evaluate(activation),
            Node::Or(n) => eval_or(n, activation),
            Node::And(n) => eval_and(n, activation),
            Node::Conditional(n) => eval_conditional(n, activation),
            Node::List(n) => n.evaluate(activation),
            Node::Map(n) => n.evaluate(activation),
            Node::Fold(n) => eval_fold(n, activation, LoopMode::ShortCircuit),
            Node::Watch(n) => observe::eval_watch(n, activation),
            Node::SetMembership(n) => optimize::eval_set_membership(n, activation),
            Node::ExhaustiveOr(n) => exhaustive::eval_or(n, activation),
            Node::ExhaustiveAnd(n) => exhaustive::eval_and(n, activation),
            Node::ExhaustiveConditional(n) => exhaustive::eval_conditional(n, activation),
            Node::ExhaustiveFold(n) => eval_fold(n, activation, LoopMode::Exhaustive),
        }
    }
}

impl IdentNode {
    fn evaluate(&self, activation: &dyn Activation) -> Value {
        match activation.resolve(&self.name) {
            Some(value) => value,
            None if activation.is_unknown(&self.name) => Value::unknown(self.id),
            None => Value::error(no_such_attribute(&self.name)),
        }
    }
}

impl BinaryNode {
    fn evaluate(&self, activation: &dyn Activation) -> Value {
        let lhs = self.lhs.evaluate(activation);
        let rhs = self.rhs.evaluate(activation);
        if lhs.is_unknown_or_error() {
            return lhs;
        }
        if rhs.is_unknown_or_error() {
            return rhs;
        }
        evaluate_binary(self.overload, &lhs, &rhs)
    }
}

impl ListNode {
    pub(crate) fn evaluate(&self, activation: &dyn Activation) -> Value {
        let mut items = Vec::with_capacity(self.elems.len());
        for elem in &self.elems {
            let value = elem.evaluate(activation);
            if value.is_unknown_or_error() {
                return value;
            }
            items.push(value);
        }
        Value::list(items)
    }
}

impl MapNode {
    pub(crate) fn evaluate(&self, activation: &dyn Activation) -> Value {
        if self.keys.len() != self.vals.len() {
            return Value::error(EvalError::new(format!(
                "map has {} keys but {} values",
                self.keys.len(),
                self.vals.len()
            )));
        }
        let mut map = MapValue::with_capacity(self.keys.len());
        for (key_node, val_node) in self.keys.iter().zip(&self.vals) {
            let key = key_node.evaluate(activation);
            if key.is_unknown_or_error() {
                return key;
            }
            let val = val_node.evaluate(activation);
            if val.is_unknown_or_error() {
                return val;
            }
            let Some(key) = key.to_key() else {
                return Value::error(unsupported_key_type(key.type_name()));
            };
            if let Err(dup) = map.insert(key, val) {
                return Value::error(duplicate_map_key(&dup.to_string()));
            }
        }
        Value::map(map)
    }
}

// Logical operators

/// Combine two evaluated `||` operands.
///
/// `true` absorbs everything, including errors and unknowns. Otherwise two
/// booleans give `false`, then an unknown operand wins (left first), and
/// anything else is returned as an error (left first).
pub(crate) fn logical_or(lhs: Value, rhs: Value) -> Value {
    logical(lhs, rhs, true)
}

/// Combine two evaluated `&&` operands. Mirror image of [`logical_or`].
pub(crate) fn logical_and(lhs: Value, rhs: Value) -> Value {
    logical(lhs, rhs, false)
}

fn logical(lhs: Value, rhs: Value, absorbing: bool) -> Value {
    if lhs.as_bool() == Some(absorbing) || rhs.as_bool() == Some(absorbing) {
        return Value::Bool(absorbing);
    }
    if let (Value::Bool(_), Value::Bool(_)) = (&lhs, &rhs) {
        return Value::Bool(!absorbing);
    }
    if lhs.is_unknown() {
        return lhs;
    }
    if rhs.is_unknown() {
        return rhs;
    }
    lhs.or_error(no_such_overload)
}

fn eval_or(node: &LogicalNode, activation: &dyn Activation) -> Value {
    let lhs = node.lhs.evaluate(activation);
    if lhs.as_bool() == Some(true) {
        return lhs;
    }
    let rhs = node.rhs.evaluate(activation);
    logical_or(lhs, rhs)
}

fn eval_and(node: &LogicalNode, activation: &dyn Activation) -> Value {
    let lhs = node.lhs.evaluate(activation);
    if lhs.as_bool() == Some(false) {
        return lhs;
    }
    let rhs = node.rhs.evaluate(activation);
    logical_and(lhs, rhs)
}

fn eval_conditional(node: &ConditionalNode, activation: &dyn Activation) -> Value {
    match node.cond.evaluate(activation) {
        Value::Bool(true) => node.truthy.evaluate(activation),
        Value::Bool(false) => node.falsy.evaluate(activation),
        other => other.or_error(no_such_overload),
    }
}

// Comprehensions

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoopMode {
    /// Stop as soon as the loop condition evaluates to `false`.
    ShortCircuit,
    /// Visit every element. The condition is evaluated and ignored.
    Exhaustive,
}

pub(crate) fn eval_fold(node: &FoldNode, activation: &dyn Activation, mode: LoopMode) -> Value {
    let range = node.range.evaluate(activation);
    let Some(items) = range.iter() else {
        let type_name = range.type_name();
        return range.or_error(|| not_iterable(type_name));
    };

    // Both slots go back to the pool when the guards drop, including on unwind.
    let pool = ActivationPool::global();
    let mut accu = pool.checkout(&node.accu_var);
    accu.set(node.accu_init.evaluate(activation));
    let mut iter = pool.checkout(&node.iter_var);

    for item in items {
        iter.set(item);
        let next = {
            let accu_scope = accu.scope(activation);
            let iter_scope = iter.scope(&accu_scope);
            let cond = node.cond.evaluate(&iter_scope);
            if mode == LoopMode::ShortCircuit && cond.as_bool() == Some(false) {
                break;
            }
            node.step.evaluate(&iter_scope)
        };
        accu.set(next);
    }

    let accu_scope = accu.scope(activation);
    node.result.evaluate(&accu_scope)
}
