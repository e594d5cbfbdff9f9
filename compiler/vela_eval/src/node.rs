//! The interpretable tree.
//!
//! A [`Node`] is a closed set of variants. Each node carries the [`NodeId`]
//! of the source expression it was planned from; wrapper nodes produced by
//! decorators ([`WatchNode`], [`SetMembershipNode`]) report the id of the
//! node they replaced, so observers and unknown sets always speak in terms
//! of source expressions.
//!
//! Children are owned (`Box<Node>` / `Vec<Node>`). Decorators take a node
//! by value and return its replacement; see [`crate::decorators`].
//!
//! Evaluation lives in `eval.rs` and the decorator modules.

use std::fmt;
use std::mem;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use vela_ir::{NodeId, Overload};
use vela_value::{Value, ValueKey};

use crate::stack::ensure_sufficient_stack;

/// Callback invoked with `(id, value)` after a watched node evaluates.
pub type Observer = Arc<dyn Fn(NodeId, &Value) + Send + Sync>;

/// A node of the interpretable tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// Literal value.
    Const(ConstNode),
    /// Variable reference resolved against the activation.
    Ident(IdentNode),
    /// Binary operator application.
    Binary(BinaryNode),
    /// Short-circuit logical or.
    Or(LogicalNode),
    /// Short-circuit logical and.
    And(LogicalNode),
    /// Short-circuit ternary.
    Conditional(ConditionalNode),
    /// List construction.
    List(ListNode),
    /// Map construction.
    Map(MapNode),
    /// Comprehension loop. Stops once the loop condition is `false`.
    Fold(FoldNode),
    /// Reports the wrapped node's value to an observer.
    Watch(WatchNode),
    /// `in` test against a constant set of primitives.
    SetMembership(SetMembershipNode),
    /// Logical or that always evaluates both operands.
    ExhaustiveOr(LogicalNode),
    /// Logical and that always evaluates both operands.
    ExhaustiveAnd(LogicalNode),
    /// Ternary that always evaluates all three operands.
    ExhaustiveConditional(ConditionalNode),
    /// Comprehension loop that runs over the whole range.
    ExhaustiveFold(FoldNode),
}

#[derive(Clone, Debug)]
pub struct ConstNode {
    pub id: NodeId,
    pub value: Value,
}

#[derive(Clone, Debug)]
pub struct IdentNode {
    pub id: NodeId,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct BinaryNode {
    pub id: NodeId,
    pub overload: Overload,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

/// Operands of `||` / `&&`, shared by the short-circuit and exhaustive forms.
#[derive(Clone, Debug)]
pub struct LogicalNode {
    pub id: NodeId,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

#[derive(Clone, Debug)]
pub struct ConditionalNode {
    pub id: NodeId,
    pub cond: Box<Node>,
    pub truthy: Box<Node>,
    pub falsy: Box<Node>,
}

#[derive(Clone, Debug)]
pub struct ListNode {
    pub id: NodeId,
    pub elems: Vec<Node>,
}

/// Map construction. `keys[i]` pairs with `vals[i]`.
#[derive(Clone, Debug)]
pub struct MapNode {
    pub id: NodeId,
    pub keys: Vec<Node>,
    pub vals: Vec<Node>,
}

/// Comprehension loop.
///
/// `accu_var` starts at `accu_init`. For each element of `range`, `iter_var`
/// is bound to the element, `cond` is evaluated, and `step` computes the
/// next accumulator. `result` is evaluated with only `accu_var` in scope.
#[derive(Clone, Debug)]
pub struct FoldNode {
    pub id: NodeId,
    pub accu_var: String,
    pub iter_var: String,
    pub range: Box<Node>,
    pub accu_init: Box<Node>,
    pub cond: Box<Node>,
    pub step: Box<Node>,
    pub result: Box<Node>,
}

/// Wraps a node and reports its value after every evaluation.
#[derive(Clone)]
pub struct WatchNode {
    pub(crate) inner: Box<Node>,
    pub(crate) observer: Observer,
}

impl WatchNode {
    pub fn new(inner: Node, observer: Observer) -> Self {
        WatchNode {
            inner: Box::new(inner),
            observer,
        }
    }

    pub fn inner(&self) -> &Node {
        &self.inner
    }
}

impl fmt::Debug for WatchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchNode")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// `arg in <constant list>` answered by a hash lookup.
///
/// Only built by the optimizer, and only when every list element is a
/// hashable primitive of `arg_type`.
#[derive(Clone, Debug)]
pub struct SetMembershipNode {
    pub(crate) inner: BinaryNode,
    pub(crate) arg_type: &'static str,
    pub(crate) value_set: FxHashMap<ValueKey, Value>,
}

impl SetMembershipNode {
    /// The replaced `in` call.
    pub fn inner(&self) -> &BinaryNode {
        &self.inner
    }

    /// The operand tested for membership.
    pub fn arg(&self) -> &Node {
        &self.inner.lhs
    }

    /// Type name shared by every element of the set.
    pub fn arg_type(&self) -> &'static str {
        self.arg_type
    }

    pub fn len(&self) -> usize {
        self.value_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value_set.is_empty()
    }
}

// Construction

impl Node {
    pub fn constant(id: NodeId, value: impl Into<Value>) -> Node {
        Node::Const(ConstNode {
            id,
            value: value.into(),
        })
    }

    pub fn ident(id: NodeId, name: impl Into<String>) -> Node {
        Node::Ident(IdentNode {
            id,
            name: name.into(),
        })
    }

    pub fn binary(id: NodeId, overload: Overload, lhs: Node, rhs: Node) -> Node {
        Node::Binary(BinaryNode {
            id,
            overload,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn or(id: NodeId, lhs: Node, rhs: Node) -> Node {
        Node::Or(LogicalNode::new(id, lhs, rhs))
    }

    pub fn and(id: NodeId, lhs: Node, rhs: Node) -> Node {
        Node::And(LogicalNode::new(id, lhs, rhs))
    }

    pub fn conditional(id: NodeId, cond: Node, truthy: Node, falsy: Node) -> Node {
        Node::Conditional(ConditionalNode {
            id,
            cond: Box::new(cond),
            truthy: Box::new(truthy),
            falsy: Box::new(falsy),
        })
    }

    pub fn list(id: NodeId, elems: Vec<Node>) -> Node {
        Node::List(ListNode { id, elems })
    }

    pub fn map(id: NodeId, entries: Vec<(Node, Node)>) -> Node {
        let (keys, vals) = entries.into_iter().unzip();
        Node::Map(MapNode { id, keys, vals })
    }

    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the seven parts of a comprehension"
    )]
    pub fn fold(
        id: NodeId,
        accu_var: impl Into<String>,
        accu_init: Node,
        iter_var: impl Into<String>,
        range: Node,
        cond: Node,
        step: Node,
        result: Node,
    ) -> Node {
        Node::Fold(FoldNode {
            id,
            accu_var: accu_var.into(),
            iter_var: iter_var.into(),
            range: Box::new(range),
            accu_init: Box::new(accu_init),
            cond: Box::new(cond),
            step: Box::new(step),
            result: Box::new(result),
        })
    }
}

impl LogicalNode {
    pub fn new(id: NodeId, lhs: Node, rhs: Node) -> Self {
        LogicalNode {
            id,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

// Queries

impl Node {
    /// Id of the source expression this node evaluates.
    pub fn id(&self) -> NodeId {
        match self {
            Node::Const(n) => n.id,
            Node::Ident(n) => n.id,
            Node::Binary(n) => n.id,
            Node::Or(n) | Node::And(n) | Node::ExhaustiveOr(n) | Node::ExhaustiveAnd(n) => n.id,
            Node::Conditional(n) | Node::ExhaustiveConditional(n) => n.id,
            Node::List(n) => n.id,
            Node::Map(n) => n.id,
            Node::Fold(n) | Node::ExhaustiveFold(n) => n.id,
            Node::Watch(n) => n.inner.id(),
            Node::SetMembership(n) => n.inner.id,
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Const(_) => "const",
            Node::Ident(_) => "ident",
            Node::Binary(_) => "binary",
            Node::Or(_) => "or",
            Node::And(_) => "and",
            Node::Conditional(_) => "conditional",
            Node::List(_) => "list",
            Node::Map(_) => "map",
            Node::Fold(_) => "fold",
            Node::Watch(_) => "watch",
            Node::SetMembership(_) => "set_membership",
            Node::ExhaustiveOr(_) => "exhaustive_or",
            Node::ExhaustiveAnd(_) => "exhaustive_and",
            Node::ExhaustiveConditional(_) => "exhaustive_conditional",
            Node::ExhaustiveFold(_) => "exhaustive_fold",
        }
    }

    /// The literal value, if this is a constant.
    pub fn as_const(&self) -> Option<&Value> {
        match self {
            Node::Const(n) => Some(&n.value),
            _ => None,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Node::Const(_))
    }

    /// Number of nodes in this subtree, wrappers included.
    pub fn size(&self) -> usize {
        ensure_sufficient_stack(|| {
            let mut count = 1;
            self.for_each_child(|child| count += child.size());
            count
        })
    }

    /// Visit direct children in evaluation order.
    pub fn for_each_child(&self, mut f: impl FnMut(&Node)) {
        match self {
            Node::Const(_) | Node::Ident(_) => {}
            Node::Binary(n) => {
                f(&n.lhs);
                f(&n.rhs);
            }
            Node::Or(n) | Node::And(n) | Node::ExhaustiveOr(n) | Node::ExhaustiveAnd(n) => {
                f(&n.lhs);
                f(&n.rhs);
            }
            Node::Conditional(n) | Node::ExhaustiveConditional(n) => {
                f(&n.cond);
                f(&n.truthy);
                f(&n.falsy);
            }
            Node::List(n) => n.elems.iter().for_each(f),
            Node::Map(n) => {
                for (k, v) in n.keys.iter().zip(&n.vals) {
                    f(k);
                    f(v);
                }
            }
            Node::Fold(n) | Node::ExhaustiveFold(n) => {
                f(&n.range);
                f(&n.accu_init);
                f(&n.cond);
                f(&n.step);
                f(&n.result);
            }
            Node::Watch(n) => f(&n.inner),
            Node::SetMembership(n) => {
                f(&n.inner.lhs);
                f(&n.inner.rhs);
            }
        }
    }
}

// Rebuilding

impl Node {
    /// Replace every direct child with `f(child)`, in evaluation order.
    ///
    /// Stops at the first error. The node's own variant and id are kept.
    pub fn try_map_children<E>(
        mut self,
        mut f: impl FnMut(Node) -> Result<Node, E>,
    ) -> Result<Node, E> {
        let f = &mut f;
        match &mut self {
            Node::Const(_) | Node::Ident(_) => {}
            Node::Binary(n) => {
                replace_child(&mut n.lhs, f)?;
                replace_child(&mut n.rhs, f)?;
            }
            Node::Or(n) | Node::And(n) | Node::ExhaustiveOr(n) | Node::ExhaustiveAnd(n) => {
                replace_child(&mut n.lhs, f)?;
                replace_child(&mut n.rhs, f)?;
            }
            Node::Conditional(n) | Node::ExhaustiveConditional(n) => {
                replace_child(&mut n.cond, f)?;
                replace_child(&mut n.truthy, f)?;
                replace_child(&mut n.falsy, f)?;
            }
            Node::List(n) => {
                for elem in &mut n.elems {
                    replace_child(elem, f)?;
                }
            }
            Node::Map(n) => {
                // Keys and values interleave; extra entries on either side
                // are still visited so validation can report them.
                for i in 0..n.keys.len().max(n.vals.len()) {
                    if let Some(key) = n.keys.get_mut(i) {
                        replace_child(key, f)?;
                    }
                    if let Some(val) = n.vals.get_mut(i) {
                        replace_child(val, f)?;
                    }
                }
            }
            Node::Fold(n) | Node::ExhaustiveFold(n) => {
                replace_child(&mut n.range, f)?;
                replace_child(&mut n.accu_init, f)?;
                replace_child(&mut n.cond, f)?;
                replace_child(&mut n.step, f)?;
                replace_child(&mut n.result, f)?;
            }
            Node::Watch(n) => replace_child(&mut n.inner, f)?,
            Node::SetMembership(n) => {
                replace_child(&mut n.inner.lhs, f)?;
                replace_child(&mut n.inner.rhs, f)?;
            }
        }
        Ok(self)
    }

    /// Childless stand-in for a child that has been moved out.
    fn hole() -> Node {
        Node::Const(ConstNode {
            id: NodeId::INVALID,
            value: Value::Null,
        })
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Node::Const(_) | Node::Ident(_))
    }
}

fn replace_child<E>(
    slot: &mut Node,
    f: &mut impl FnMut(Node) -> Result<Node, E>,
) -> Result<(), E> {
    let child = mem::replace(slot, Node::hole());
    *slot = f(child)?;
    Ok(())
}

// Teardown
//
// The derived drop glue would recurse once per tree level. Every node kind
// that owns children instead moves its non-leaf children onto a work stack
// and drops them one at a time, each already stripped of its own subtrees.

/// Moves `slot` onto `stack` unless it is a leaf.
fn detach(slot: &mut Node, stack: &mut Vec<Node>) {
    if !slot.is_leaf() {
        stack.push(mem::replace(slot, Node::hole()));
    }
}

fn drain(mut stack: Vec<Node>) {
    while let Some(mut node) = stack.pop() {
        node.detach_children(&mut stack);
    }
}

impl Node {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        match self {
            Node::Const(_) | Node::Ident(_) => {}
            Node::Binary(n) => n.detach_children(stack),
            Node::Or(n) | Node::And(n) | Node::ExhaustiveOr(n) | Node::ExhaustiveAnd(n) => {
                n.detach_children(stack);
            }
            Node::Conditional(n) | Node::ExhaustiveConditional(n) => n.detach_children(stack),
            Node::List(n) => n.detach_children(stack),
            Node::Map(n) => n.detach_children(stack),
            Node::Fold(n) | Node::ExhaustiveFold(n) => n.detach_children(stack),
            Node::Watch(n) => n.detach_children(stack),
            Node::SetMembership(n) => n.inner.detach_children(stack),
        }
    }
}

impl BinaryNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        detach(&mut self.lhs, stack);
        detach(&mut self.rhs, stack);
    }
}

impl LogicalNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        detach(&mut self.lhs, stack);
        detach(&mut self.rhs, stack);
    }
}

impl ConditionalNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        detach(&mut self.cond, stack);
        detach(&mut self.truthy, stack);
        detach(&mut self.falsy, stack);
    }
}

impl ListNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        for elem in &mut self.elems {
            detach(elem, stack);
        }
    }
}

impl MapNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        for node in self.keys.iter_mut().chain(&mut self.vals) {
            detach(node, stack);
        }
    }
}

impl FoldNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        detach(&mut self.range, stack);
        detach(&mut self.accu_init, stack);
        detach(&mut self.cond, stack);
        detach(&mut self.step, stack);
        detach(&mut self.result, stack);
    }
}

impl WatchNode {
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        detach(&mut self.inner, stack);
    }
}

macro_rules! drop_iteratively {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Drop for $ty {
                fn drop(&mut self) {
                    let mut stack = Vec::new();
                    self.detach_children(&mut stack);
                    drain(stack);
                }
            }
        )*
    };
}

drop_iteratively!(
    BinaryNode,
    LogicalNode,
    ConditionalNode,
    ListNode,
    MapNode,
    FoldNode,
    WatchNode,
);
