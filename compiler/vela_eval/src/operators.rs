//! Binary operator semantics.
//!
//! [`evaluate_binary`] applies an [`Overload`] to two already-evaluated
//! operands. Callers handle unknown/error propagation first; here every
//! operand is a plain value. Type mismatches produce a "no such overload"
//! error value; integer arithmetic is checked.

use std::cmp::Ordering;

use vela_ir::Overload;
use vela_value::{integer_overflow, no_such_overload, Value};

/// Apply `overload` to `lhs` and `rhs`.
pub fn evaluate_binary(overload: Overload, lhs: &Value, rhs: &Value) -> Value {
    match overload {
        Overload::Add => add(lhs, rhs),
        Overload::Subtract => subtract(lhs, rhs),
        Overload::Multiply => multiply(lhs, rhs),
        Overload::Equals => lhs.equal(rhs),
        Overload::NotEquals => match lhs.equal(rhs) {
            Value::Bool(b) => Value::Bool(!b),
            other => other,
        },
        Overload::Less => compare(lhs, rhs, Ordering::is_lt),
        Overload::Greater => compare(lhs, rhs, Ordering::is_gt),
        Overload::InList => in_list(lhs, rhs),
        Overload::InMap => in_map(lhs, rhs),
    }
}

fn overflow_or(result: Option<i64>, op: &str) -> Value {
    result.map_or_else(|| Value::error(integer_overflow(op)), Value::Int)
}

fn overflow_or_uint(result: Option<u64>, op: &str) -> Value {
    result.map_or_else(|| Value::error(integer_overflow(op)), Value::Uint)
}

fn add(lhs: &Value, rhs: &Value) -> Value {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => overflow_or(a.checked_add(*b), "addition"),
        (Value::Uint(a), Value::Uint(b)) => overflow_or_uint(a.checked_add(*b), "addition"),
        (Value::Double(a), Value::Double(b)) => Value::Double(a + b),
        (Value::Str(a), Value::Str(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Value::string(s)
        }
        (Value::Bytes(a), Value::Bytes(b)) => {
            let mut v = Vec::with_capacity(a.len() + b.len());
            v.extend_from_slice(a);
            v.extend_from_slice(b);
            Value::bytes(v)
        }
        (Value::List(a), Value::List(b)) => {
            let mut items = Vec::with_capacity(a.len() + b.len());
            items.extend(a.iter().cloned());
            items.extend(b.iter().cloned());
            Value::list(items)
        }
        _ => Value::error(no_such_overload()),
    }
}

fn subtract(lhs: &Value, rhs: &Value) -> Value {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => overflow_or(a.checked_sub(*b), "subtraction"),
        (Value::Uint(a), Value::Uint(b)) => overflow_or_uint(a.checked_sub(*b), "subtraction"),
        (Value::Double(a), Value::Double(b)) => Value::Double(a - b),
        _ => Value::error(no_such_overload()),
    }
}

fn multiply(lhs: &Value, rhs: &Value) -> Value {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => overflow_or(a.checked_mul(*b), "multiplication"),
        (Value::Uint(a), Value::Uint(b)) => overflow_or_uint(a.checked_mul(*b), "multiplication"),
        (Value::Double(a), Value::Double(b)) => Value::Double(a * b),
        _ => Value::error(no_such_overload()),
    }
}

/// Ordering comparison between two values of the same type.
///
/// `NaN` compares unordered, so both `<` and `>` are false.
fn compare(lhs: &Value, rhs: &Value, pred: fn(Ordering) -> bool) -> Value {
    let ordering = match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.as_slice().cmp(b.as_slice())),
        _ => return Value::error(no_such_overload()),
    };
    Value::Bool(ordering.is_some_and(pred))
}

/// Linear `in` over a list.
///
/// Elements are compared with language equality in order. A match wins even
/// if an earlier comparison failed; without a match, a failed comparison
/// makes the whole test a "no such overload" error.
fn in_list(elem: &Value, list: &Value) -> Value {
    let Some(items) = list.as_list() else {
        return Value::error(no_such_overload());
    };
    let mut failed = false;
    for item in items {
        match elem.equal(item) {
            Value::Bool(true) => return Value::Bool(true),
            Value::Bool(false) => {}
            _ => failed = true,
        }
    }
    if failed {
        Value::error(no_such_overload())
    } else {
        Value::Bool(false)
    }
}

/// Key lookup in a map.
fn in_map(key: &Value, map: &Value) -> Value {
    let Some(map) = map.as_map() else {
        return Value::error(no_such_overload());
    };
    if !key.is_primitive() {
        return Value::error(no_such_overload());
    }
    Value::Bool(key.to_key().is_some_and(|k| map.contains_key(&k)))
}
