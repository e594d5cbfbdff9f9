//! Plan-time optimization.
//!
//! Two rewrites:
//! - a list or map literal whose entries are all constants is evaluated once
//!   and replaced by a constant with the literal's id
//! - `x in <constant list>` becomes a [`SetMembershipNode`] when every
//!   element is a hashable primitive of one type, and `false` when the list
//!   is empty
//!
//! Because the pipeline is bottom-up, a list literal is already folded to a
//! constant by the time its enclosing `in` call is visited. Constants that an
//! earlier decorator wrapped in a watch still count as constants; folding
//! drops the wrappers of the folded children.

use rustc_hash::FxHashMap;
use vela_ir::Overload;
use vela_value::{no_such_overload, Traits, Value};

use super::{DecorateError, Decorator};
use crate::activation::{Activation, EmptyActivation};
use crate::node::{BinaryNode, ConstNode, ListNode, MapNode, Node, SetMembershipNode};

/// Constant folding for literals and hash-based membership tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct Optimize;

impl Decorator for Optimize {
    fn decorate(&self, node: Node) -> Result<Node, DecorateError> {
        match node {
            Node::List(list) => Ok(fold_list(list)),
            Node::Map(map) => Ok(fold_map(map)),
            Node::Binary(call) if call.overload == Overload::InList => plan_membership(call),
            other => Ok(other),
        }
    }
}

/// The constant under any watch wrappers.
fn as_constant(node: &Node) -> Option<&ConstNode> {
    match node {
        Node::Const(c) => Some(c),
        Node::Watch(w) => as_constant(w.inner()),
        _ => None,
    }
}

/// Unwrapped copies of `nodes`, if every one is a constant.
fn constants(nodes: &[Node]) -> Option<Vec<Node>> {
    nodes
        .iter()
        .map(|n| as_constant(n).map(|c| Node::Const(c.clone())))
        .collect()
}

fn fold_list(list: ListNode) -> Node {
    let Some(elems) = constants(&list.elems) else {
        return Node::List(list);
    };
    let literal = ListNode { id: list.id, elems };
    let value = literal.evaluate(&EmptyActivation);
    tracing::trace!(id = %list.id, len = literal.elems.len(), "folded constant list");
    Node::Const(ConstNode { id: list.id, value })
}

fn fold_map(map: MapNode) -> Node {
    let (Some(keys), Some(vals)) = (constants(&map.keys), constants(&map.vals)) else {
        return Node::Map(map);
    };
    let literal = MapNode { id: map.id, keys, vals };
    let value = literal.evaluate(&EmptyActivation);
    tracing::trace!(id = %map.id, len = literal.keys.len(), "folded constant map");
    Node::Const(ConstNode { id: map.id, value })
}

fn plan_membership(call: BinaryNode) -> Result<Node, DecorateError> {
    let Some(rhs) = as_constant(&call.rhs) else {
        return Ok(Node::Binary(call));
    };
    if rhs.value.is_unknown_or_error() {
        return Ok(Node::Binary(call));
    }
    if !rhs.value.has_trait(Traits::LISTER) {
        return Err(DecorateError::NotAList {
            id: call.id,
            type_name: rhs.value.type_name(),
        });
    }
    let items = rhs.value.as_list().unwrap_or_default();

    if items.is_empty() {
        tracing::trace!(id = %call.id, "membership in empty list is false");
        return Ok(Node::Const(ConstNode {
            id: call.id,
            value: Value::Bool(false),
        }));
    }

    let mut arg_type = None;
    let mut value_set = FxHashMap::default();
    for item in items {
        // Only hashable primitives of a single type qualify.
        let Some(key) = item.to_key() else {
            return Ok(Node::Binary(call));
        };
        match arg_type {
            None => arg_type = Some(item.type_name()),
            Some(t) if t != item.type_name() => return Ok(Node::Binary(call)),
            Some(_) => {}
        }
        value_set.insert(key, Value::Bool(true));
    }
    let Some(arg_type) = arg_type else {
        return Ok(Node::Binary(call));
    };

    tracing::debug!(id = %call.id, arg_type, len = value_set.len(), "planned set membership");
    Ok(Node::SetMembership(SetMembershipNode {
        inner: call,
        arg_type,
        value_set,
    }))
}

pub(crate) fn eval_set_membership(node: &SetMembershipNode, activation: &dyn Activation) -> Value {
    let value = node.arg().evaluate(activation);
    if value.type_name() != node.arg_type {
        return value.or_error(no_such_overload);
    }
    value
        .to_key()
        .and_then(|key| node.value_set.get(&key))
        .cloned()
        .unwrap_or(Value::Bool(false))
}
