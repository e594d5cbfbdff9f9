//! Exhaustive evaluation: truth tables, equivalence with the short-circuit
//! forms, and observation of which operands actually run.

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vela_ir::{NodeId, Overload};
use vela_value::{no_such_overload, not_iterable, Value};

use crate::activation::{MapActivation, PartialActivation};
use crate::decorators::{observe_eval, DisableShortCircuits, Pipeline};
use crate::node::Node;
use crate::test_helpers::{id, ints, sum_fold, Operand};

/// Activation under which `Operand::node(n)` evaluates to `Operand::value(n)`
/// for ids 2 and 3.
fn operand_activation() -> PartialActivation {
    PartialActivation::default()
        .with_unknown("u2")
        .with_unknown("u3")
}

fn exhaustive(tree: Node) -> Node {
    Pipeline::new()
        .with(DisableShortCircuits)
        .apply(tree)
        .unwrap()
}

/// Expected `||` result per the dominance order: true, then false/false,
/// then unknown (left first), then an error (left first).
fn expected_or(l: Operand, r: Operand) -> Value {
    use Operand::{Error, False, True, Unknown};
    match (l, r) {
        (True, _) | (_, True) => Value::Bool(true),
        (False, False) => Value::Bool(false),
        (Unknown, _) => l.value(2),
        (_, Unknown) => r.value(3),
        (Error, _) => l.value(2),
        // (False, Error): the left operand is a plain bool, so the error is new.
        (False, Error) => Value::error(no_such_overload()),
    }
}

fn expected_and(l: Operand, r: Operand) -> Value {
    use Operand::{Error, False, True, Unknown};
    match (l, r) {
        (False, _) | (_, False) => Value::Bool(false),
        (True, True) => Value::Bool(true),
        (Unknown, _) => l.value(2),
        (_, Unknown) => r.value(3),
        (Error, _) => l.value(2),
        (True, Error) => Value::error(no_such_overload()),
    }
}

#[test]
fn test_exhaustive_or_truth_table() {
    let act = operand_activation();
    for l in Operand::ALL {
        for r in Operand::ALL {
            let tree = exhaustive(Node::or(id(1), l.node(2), r.node(3)));
            assert_eq!(tree.kind(), "exhaustive_or");
            assert_eq!(tree.evaluate(&act), expected_or(l, r), "{l:?} || {r:?}");
        }
    }
}

#[test]
fn test_exhaustive_and_truth_table() {
    let act = operand_activation();
    for l in Operand::ALL {
        for r in Operand::ALL {
            let tree = exhaustive(Node::and(id(1), l.node(2), r.node(3)));
            assert_eq!(tree.kind(), "exhaustive_and");
            assert_eq!(tree.evaluate(&act), expected_and(l, r), "{l:?} && {r:?}");
        }
    }
}

#[test]
fn test_short_circuit_forms_share_the_truth_table() {
    let act = operand_activation();
    for l in Operand::ALL {
        for r in Operand::ALL {
            let or = Node::or(id(1), l.node(2), r.node(3));
            assert_eq!(or.evaluate(&act), expected_or(l, r), "{l:?} || {r:?}");
            let and = Node::and(id(1), l.node(2), r.node(3));
            assert_eq!(and.evaluate(&act), expected_and(l, r), "{l:?} && {r:?}");
        }
    }
}

#[test]
fn test_unknown_beats_error() {
    let act = operand_activation();
    let tree = exhaustive(Node::or(
        id(1),
        Operand::Error.node(2),
        Operand::Unknown.node(3),
    ));
    assert_eq!(tree.evaluate(&act), Value::unknown(NodeId::new(3)));
}

/// Records the ids of every evaluated node, in evaluation order.
///
/// Exhaustive twins are swapped in before the observer wraps each node.
fn probe(exhaustive: bool) -> (Arc<Mutex<Vec<u32>>>, Pipeline) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let mut pipeline = Pipeline::new();
    if exhaustive {
        pipeline.push(DisableShortCircuits);
    }
    pipeline.push(observe_eval(move |id, _| log.lock().push(id.raw())));
    (seen, pipeline)
}

#[test]
fn test_exhaustive_or_evaluates_rhs_after_true() {
    let tree = Node::or(id(1), Node::constant(id(2), true), Node::constant(id(3), false));

    let (seen, pipeline) = probe(false);
    let short = pipeline.apply(tree.clone()).unwrap();
    assert_eq!(short.evaluate(&MapActivation::new()), Value::Bool(true));
    assert_eq!(*seen.lock(), vec![2, 1]);

    let (seen, pipeline) = probe(true);
    let full = pipeline.apply(tree).unwrap();
    assert_eq!(full.evaluate(&MapActivation::new()), Value::Bool(true));
    assert_eq!(*seen.lock(), vec![2, 3, 1]);
}

#[test]
fn test_exhaustive_and_evaluates_rhs_after_false() {
    let tree = Node::and(id(1), Node::constant(id(2), false), Node::constant(id(3), true));
    let (seen, pipeline) = probe(true);
    let full = pipeline.apply(tree).unwrap();
    assert_eq!(full.evaluate(&MapActivation::new()), Value::Bool(false));
    assert_eq!(*seen.lock(), vec![2, 3, 1]);
}

#[test]
fn test_exhaustive_conditional_evaluates_both_branches() {
    let tree = Node::conditional(
        id(1),
        Node::constant(id(2), true),
        Node::constant(id(3), 10_i64),
        Node::constant(id(4), 20_i64),
    );

    let (seen, pipeline) = probe(false);
    let short = pipeline.apply(tree.clone()).unwrap();
    assert_eq!(short.evaluate(&MapActivation::new()), Value::Int(10));
    assert_eq!(*seen.lock(), vec![2, 3, 1]);

    let (seen, pipeline) = probe(true);
    let full = pipeline.apply(tree).unwrap();
    assert_eq!(full.evaluate(&MapActivation::new()), Value::Int(10));
    assert_eq!(*seen.lock(), vec![2, 3, 4, 1]);
}

#[test]
fn test_exhaustive_conditional_non_bool_guard() {
    let tree = exhaustive(Node::conditional(
        id(1),
        Node::constant(id(2), "yes"),
        Node::constant(id(3), 1_i64),
        Node::constant(id(4), 2_i64),
    ));
    assert_eq!(
        tree.evaluate(&MapActivation::new()),
        Value::error(no_such_overload())
    );
}

#[test]
fn test_exhaustive_conditional_propagates_unknown_guard() {
    let act = PartialActivation::default().with_unknown("c");
    let tree = exhaustive(Node::conditional(
        id(1),
        Node::ident(id(2), "c"),
        Node::constant(id(3), 1_i64),
        Node::constant(id(4), 2_i64),
    ));
    assert_eq!(tree.evaluate(&act), Value::unknown(id(2)));
}

/// `range.fold(acc = 0, x, acc < 3, acc + x, acc)`.
fn guarded_sum() -> Node {
    Node::fold(
        id(1),
        "acc",
        Node::constant(id(3), 0_i64),
        "x",
        Node::ident(id(2), "range"),
        Node::binary(id(4), Overload::Less, Node::ident(id(5), "acc"), Node::constant(id(6), 3_i64)),
        Node::binary(id(7), Overload::Add, Node::ident(id(8), "acc"), Node::ident(id(9), "x")),
        Node::ident(id(10), "acc"),
    )
}

#[test]
fn test_exhaustive_fold_ignores_condition() {
    let act = MapActivation::new().with("range", ints(&[1, 2, 3, 4]));
    assert_eq!(guarded_sum().evaluate(&act), Value::Int(3));
    assert_eq!(exhaustive(guarded_sum()).evaluate(&act), Value::Int(10));
}

#[test]
fn test_exhaustive_fold_evaluates_condition_every_iteration() {
    let (seen, pipeline) = probe(true);
    let tree = pipeline.apply(guarded_sum()).unwrap();
    let act = MapActivation::new().with("range", ints(&[1, 2, 3, 4]));
    tree.evaluate(&act);
    let cond_evals = seen.lock().iter().filter(|&&n| n == 4).count();
    assert_eq!(cond_evals, 4);
}

#[test]
fn test_short_circuit_fold_stops_at_false_condition() {
    let (seen, pipeline) = probe(false);
    let tree = pipeline.apply(guarded_sum()).unwrap();
    let act = MapActivation::new().with("range", ints(&[1, 2, 3, 4]));
    assert_eq!(tree.evaluate(&act), Value::Int(3));
    let seen = seen.lock();
    // The condition runs three times (true, true, false); the step twice.
    assert_eq!(seen.iter().filter(|&&n| n == 4).count(), 3);
    assert_eq!(seen.iter().filter(|&&n| n == 7).count(), 2);
}

#[test]
fn test_short_circuit_fold_continues_on_error_condition() {
    // A condition that is an error (not `false`) does not stop the loop.
    let tree = Node::fold(
        id(1),
        "acc",
        Node::constant(id(3), 0_i64),
        "x",
        Node::ident(id(2), "range"),
        Node::ident(id(4), "missing"),
        Node::binary(id(5), Overload::Add, Node::ident(id(6), "acc"), Node::ident(id(7), "x")),
        Node::ident(id(8), "acc"),
    );
    let act = MapActivation::new().with("range", ints(&[1, 2, 3]));
    assert_eq!(tree.evaluate(&act), Value::Int(6));
}

#[test]
fn test_exhaustive_fold_non_iterable_range() {
    let act = MapActivation::new().with("range", Value::Bool(true));
    assert_eq!(
        exhaustive(sum_fold()).evaluate(&act),
        Value::error(not_iterable("bool"))
    );
}

#[test]
fn test_exhaustive_fold_over_map_keys() {
    let range = Node::map(
        id(20),
        vec![
            (Node::constant(id(21), 1_i64), Node::constant(id(22), "a")),
            (Node::constant(id(23), 2_i64), Node::constant(id(24), "b")),
        ],
    );
    let tree = exhaustive(Node::fold(
        id(1),
        "acc",
        Node::constant(id(3), 0_i64),
        "k",
        range,
        Node::constant(id(4), true),
        Node::binary(id(5), Overload::Add, Node::ident(id(6), "acc"), Node::ident(id(7), "k")),
        Node::ident(id(8), "acc"),
    ));
    assert_eq!(tree.evaluate(&MapActivation::new()), Value::Int(3));
}

// Equivalence on fully-defined inputs

fn bool_leaf(n: u32, b: bool) -> Node {
    Node::constant(id(n), b)
}

proptest! {
    #[test]
    fn prop_or_and_agree_on_bools(l: bool, r: bool) {
        let act = MapActivation::new();
        for build in [Node::or as fn(NodeId, Node, Node) -> Node, Node::and] {
            let tree = build(id(1), bool_leaf(2, l), bool_leaf(3, r));
            let short = tree.evaluate(&act);
            let full = exhaustive(tree).evaluate(&act);
            prop_assert_eq!(short, full);
        }
    }

    #[test]
    fn prop_conditional_agrees_on_defined_input(c: bool, t: i64, f: i64) {
        let act = MapActivation::new();
        let tree = Node::conditional(
            id(1),
            bool_leaf(2, c),
            Node::constant(id(3), t),
            Node::constant(id(4), f),
        );
        let short = tree.evaluate(&act);
        let full = exhaustive(tree).evaluate(&act);
        prop_assert_eq!(&short, &full);
        prop_assert_eq!(short, Value::Int(if c { t } else { f }));
    }

    #[test]
    fn prop_fold_agrees_when_condition_holds(items in prop::collection::vec(-1000_i64..1000, 0..16)) {
        let act = MapActivation::new().with("range", ints(&items));
        let short = sum_fold().evaluate(&act);
        let full = exhaustive(sum_fold()).evaluate(&act);
        prop_assert_eq!(&short, &full);
        prop_assert_eq!(short, Value::Int(items.iter().sum()));
    }
}
