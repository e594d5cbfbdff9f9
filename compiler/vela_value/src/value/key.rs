//! Hashable keys for primitive values.
//!
//! Only primitive values have a structural equality that is also a valid
//! hash-map equality. `ValueKey` is that restricted form: it can only be
//! built through [`Value::to_key`], which refuses aggregates, sentinels and
//! NaN. Doubles are stored as normalized bits so `-0.0` and `0.0` collapse
//! to the same key, matching `==` on values.

use std::fmt;

use super::{Heap, Value};

/// Hashable form of a primitive value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// Normalized `f64` bits (never NaN, never `-0.0`).
    Double(u64),
    Str(Heap<String>),
    Bytes(Heap<Vec<u8>>),
}

impl ValueKey {
    pub(super) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ValueKey::Bool(*b)),
            Value::Int(n) => Some(ValueKey::Int(*n)),
            Value::Uint(n) => Some(ValueKey::Uint(*n)),
            Value::Double(d) => {
                if d.is_nan() {
                    return None;
                }
                let normalized = if *d == 0.0 { 0.0_f64 } else { *d };
                Some(ValueKey::Double(normalized.to_bits()))
            }
            Value::Str(s) => Some(ValueKey::Str(s.clone())),
            Value::Bytes(b) => Some(ValueKey::Bytes(b.clone())),
            Value::Null
            | Value::List(_)
            | Value::Map(_)
            | Value::Error(_)
            | Value::Unknown(_) => None,
        }
    }

    /// Convert back into a runtime value (shares heap payloads).
    pub fn to_value(&self) -> Value {
        match self {
            ValueKey::Bool(b) => Value::Bool(*b),
            ValueKey::Int(n) => Value::Int(*n),
            ValueKey::Uint(n) => Value::Uint(*n),
            ValueKey::Double(bits) => Value::Double(f64::from_bits(*bits)),
            ValueKey::Str(s) => Value::Str(s.clone()),
            ValueKey::Bytes(b) => Value::Bytes(b.clone()),
        }
    }

    /// Type name of the underlying value.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKey::Bool(_) => "bool",
            ValueKey::Int(_) => "int",
            ValueKey::Uint(_) => "uint",
            ValueKey::Double(_) => "double",
            ValueKey::Str(_) => "string",
            ValueKey::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Debug for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", self.to_value())
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
