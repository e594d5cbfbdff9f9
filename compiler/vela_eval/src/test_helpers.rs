//! Tree builders shared by the unit tests.

use vela_ir::{NodeId, Overload};
use vela_value::{no_such_attribute, Value};

use crate::node::Node;

pub(crate) fn id(n: u32) -> NodeId {
    NodeId::new(n)
}

pub(crate) fn ints(ns: &[i64]) -> Value {
    Value::list(ns.iter().copied().map(Value::Int).collect())
}

/// `range.fold(acc = 0, x, true, acc + x, acc)`.
///
/// Ids: fold 1, range 2, init 3, cond 4, step 5 (acc 6, x 7), result 8.
pub(crate) fn sum_fold() -> Node {
    Node::fold(
        id(1),
        "acc",
        Node::constant(id(3), 0_i64),
        "x",
        Node::ident(id(2), "range"),
        Node::constant(id(4), true),
        Node::binary(
            id(5),
            Overload::Add,
            Node::ident(id(6), "acc"),
            Node::ident(id(7), "x"),
        ),
        Node::ident(id(8), "acc"),
    )
}

/// The four operand kinds used by the logical truth tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    True,
    False,
    Error,
    Unknown,
}

impl Operand {
    pub(crate) const ALL: [Operand; 4] = [
        Operand::True,
        Operand::False,
        Operand::Error,
        Operand::Unknown,
    ];

    /// A leaf producing this operand. Errors come from a missing variable
    /// named after the id; unknowns from the variable `u<id>`.
    pub(crate) fn node(self, n: u32) -> Node {
        match self {
            Operand::True => Node::constant(id(n), true),
            Operand::False => Node::constant(id(n), false),
            Operand::Error => Node::ident(id(n), format!("missing{n}")),
            Operand::Unknown => Node::ident(id(n), format!("u{n}")),
        }
    }

    pub(crate) fn value(self, n: u32) -> Value {
        match self {
            Operand::True => Value::Bool(true),
            Operand::False => Value::Bool(false),
            Operand::Error => Value::error(no_such_attribute(&format!("missing{n}"))),
            Operand::Unknown => Value::unknown(id(n)),
        }
    }
}
