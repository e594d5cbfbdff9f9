//! Runtime values for the Vela evaluator.
//!
//! # Heap Enforcement
//!
//! All heap allocations go through factory methods on `Value`. The
//! `Heap<T>` wrapper has a module-private constructor, so external code
//! cannot build heap payloads directly.
//!
//! ```text
//! let s = Value::string("hello");                      // OK
//! let l = Value::list(vec![Value::Int(1)]);            // OK
//! let e = Value::error(no_such_overload());            // OK
//! let s = Value::Str(Heap::new(...));                  // ERROR: Heap::new is private
//! ```
//!
//! # Thread Safety
//!
//! Heap payloads are `Arc`-backed and immutable, so `Value` is `Send + Sync`
//! and the same constant can be read by any number of concurrent
//! evaluations.

mod heap;
mod iter;
mod key;
mod map;
mod unknown;

use std::fmt;

use vela_ir::NodeId;

use crate::errors::{no_such_overload, EvalError};
use crate::Traits;

pub use heap::Heap;
pub use iter::ValueIter;
pub use key::ValueKey;
pub use map::MapValue;
pub use unknown::UnknownSet;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    // Primitives (inline, no heap allocation)
    /// The null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// Floating-point value.
    Double(f64),

    // Heap types
    /// String value.
    Str(Heap<String>),
    /// Byte string value.
    Bytes(Heap<Vec<u8>>),
    /// Ordered list of values.
    List(Heap<Vec<Value>>),
    /// Map from primitive keys to values.
    Map(Heap<MapValue>),

    // Sentinels
    /// Evaluation error.
    Error(Heap<EvalError>),
    /// Deliberately withheld input.
    Unknown(Heap<UnknownSet>),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a bytes value.
    #[inline]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(Heap::new(b.into()))
    }

    /// Create a list value.
    ///
    /// ```text
    /// let nums = Value::list(vec![Value::Int(1), Value::Int(2)]);
    /// ```
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value.
    #[inline]
    pub fn map(map: MapValue) -> Self {
        Value::Map(Heap::new(map))
    }

    /// Create an error value.
    #[inline]
    pub fn error(err: EvalError) -> Self {
        Value::Error(Heap::new(err))
    }

    /// Create an unknown value naming a single expression.
    #[inline]
    pub fn unknown(id: NodeId) -> Self {
        Value::Unknown(Heap::new(UnknownSet::new(id)))
    }

    /// Create an unknown value from a set of expression ids.
    #[inline]
    pub fn unknown_set(set: UnknownSet) -> Self {
        Value::Unknown(Heap::new(set))
    }
}

// Queries

impl Value {
    /// The runtime type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null_type",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Error(_) => "error",
            Value::Unknown(_) => "unknown",
        }
    }

    /// Capabilities of this value.
    pub fn traits(&self) -> Traits {
        match self {
            Value::Null | Value::Error(_) | Value::Unknown(_) => Traits::empty(),
            Value::Bool(_) => Traits::COMPARER,
            Value::Int(_) | Value::Uint(_) | Value::Double(_) => Traits::ADDER | Traits::COMPARER,
            Value::Str(_) | Value::Bytes(_) => Traits::ADDER | Traits::COMPARER | Traits::SIZER,
            Value::List(_) => {
                Traits::ADDER
                    | Traits::CONTAINER
                    | Traits::ITERABLE
                    | Traits::LISTER
                    | Traits::SIZER
            }
            Value::Map(_) => {
                Traits::CONTAINER | Traits::ITERABLE | Traits::MAPPER | Traits::SIZER
            }
        }
    }

    #[inline]
    pub fn has_trait(&self, t: Traits) -> bool {
        self.traits().contains(t)
    }

    /// Primitive values are the only ones usable as set/map keys.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::Int(_)
                | Value::Uint(_)
                | Value::Double(_)
                | Value::Str(_)
                | Value::Bytes(_)
        )
    }

    /// Hashable key for a primitive value.
    ///
    /// Returns `None` for non-primitives and for NaN (which is not equal to
    /// itself and so can never be found by lookup).
    #[inline]
    pub fn to_key(&self) -> Option<ValueKey> {
        ValueKey::from_value(self)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }

    #[inline]
    pub fn is_unknown_or_error(&self) -> bool {
        matches!(self, Value::Error(_) | Value::Unknown(_))
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(&**m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_error(&self) -> Option<&EvalError> {
        match self {
            Value::Error(e) => Some(&**e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_unknown(&self) -> Option<&UnknownSet> {
        match self {
            Value::Unknown(u) => Some(&**u),
            _ => None,
        }
    }

    /// Size of a sized value (strings count bytes).
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.len()),
            Value::Bytes(b) => Some(b.len()),
            Value::List(items) => Some(items.len()),
            Value::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    /// Iterate an iterable value; `None` if it lacks the `ITERABLE` trait.
    pub fn iter(&self) -> Option<ValueIter<'_>> {
        match self {
            Value::List(items) => Some(ValueIter::List(items.iter())),
            Value::Map(m) => Some(ValueIter::MapKeys(m.entries().iter())),
            _ => None,
        }
    }

    /// Keep error and unknown values, replace anything else with `err()`.
    ///
    /// Used wherever an operand has the wrong type: an operand that is
    /// already a failure explains the failure better than a fresh error.
    #[inline]
    #[must_use]
    pub fn or_error(self, err: impl FnOnce() -> EvalError) -> Value {
        if self.is_unknown_or_error() {
            self
        } else {
            Value::error(err())
        }
    }
}

// Language equality

impl Value {
    /// Language-level equality.
    ///
    /// Returns `Bool` for same-typed operands and a "no such overload" error
    /// for mismatched types. Error and unknown operands propagate, left first.
    #[expect(clippy::float_cmp, reason = "language equality is exact IEEE equality")]
    pub fn equal(&self, other: &Value) -> Value {
        if self.is_unknown_or_error() {
            return self.clone();
        }
        if other.is_unknown_or_error() {
            return other.clone();
        }
        match (self, other) {
            (Value::Null, Value::Null) => Value::Bool(true),
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a == b),
            (Value::Int(a), Value::Int(b)) => Value::Bool(a == b),
            (Value::Uint(a), Value::Uint(b)) => Value::Bool(a == b),
            (Value::Double(a), Value::Double(b)) => Value::Bool(*a == *b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a == b),
            (Value::Bytes(a), Value::Bytes(b)) => Value::Bool(a == b),
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return Value::Bool(false);
                }
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.equal(y) {
                        Value::Bool(true) => {}
                        other => return other,
                    }
                }
                Value::Bool(true)
            }
            (Value::Map(a), Value::Map(b)) => {
                if a.len() != b.len() {
                    return Value::Bool(false);
                }
                for (k, v) in a.iter() {
                    let Some(bv) = b.get(k) else {
                        return Value::Bool(false);
                    };
                    match v.equal(bv) {
                        Value::Bool(true) => {}
                        other => return other,
                    }
                }
                Value::Bool(true)
            }
            _ => Value::error(no_such_overload()),
        }
    }
}

// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<EvalError> for Value {
    #[inline]
    fn from(err: EvalError) -> Self {
        Value::error(err)
    }
}

// Formatting

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Uint(n) => write!(f, "Uint({n})"),
            Value::Double(d) => write!(f, "Double({d:?})"),
            Value::Str(s) => write!(f, "Str({:?})", s.as_str()),
            Value::Bytes(b) => write!(f, "Bytes({:?})", b.as_slice()),
            Value::List(items) => write!(f, "List({:?})", items.as_slice()),
            Value::Map(m) => {
                write!(f, "Map(")?;
                f.debug_map().entries(m.iter()).finish()?;
                write!(f, ")")
            }
            Value::Error(e) => write!(f, "Error({})", e.message),
            Value::Unknown(u) => write!(f, "Unknown({u})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}u"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Str(s) => write!(f, "\"{}\"", s.as_str()),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Error(e) => write!(f, "<error: {}>", e.message),
            Value::Unknown(u) => write!(f, "<unknown: {u}>"),
        }
    }
}

/// Structural equality, for tests and folding checks.
///
/// This is not language equality (see [`Value::equal`]): it never errors,
/// compares errors and unknowns structurally, and follows IEEE semantics for
/// doubles (so `NaN != NaN`).
impl PartialEq for Value {
    #[expect(clippy::float_cmp, reason = "structural equality is exact")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => *a == *b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Unknown(a), Value::Unknown(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
