//! Error values produced during evaluation.
//!
//! An `EvalError` is carried inside `Value::Error`; it is data, not control
//! flow. Factory functions (e.g. `no_such_overload()`) are the public API and
//! populate both `kind` and `message`.

use std::fmt;

/// Typed error category.
///
/// Lets callers match on the failure without parsing messages. The `Display`
/// impl produces the canonical message text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Dispatch
    /// No overload accepts the operand types.
    NoSuchOverload,

    // Iteration
    NotIterable {
        type_name: String,
    },

    // Access
    NoSuchAttribute {
        name: String,
    },

    // Aggregate construction
    DuplicateMapKey {
        key: String,
    },
    UnsupportedKeyType {
        type_name: String,
    },

    // Arithmetic
    IntegerOverflow {
        operation: String,
    },

    /// Catch-all for errors created from a bare message.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchOverload => write!(f, "no such overload"),
            Self::NotIterable { type_name } => {
                write!(f, "got '{type_name}', expected iterable type")
            }
            Self::NoSuchAttribute { name } => write!(f, "no such attribute: {name}"),
            Self::DuplicateMapKey { key } => write!(f, "duplicate map key: {key}"),
            Self::UnsupportedKeyType { type_name } => {
                write!(f, "unsupported map key type: {type_name}")
            }
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error carried by `Value::Error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the factory functions when a structured
    /// kind exists.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Factories

/// No overload accepts the given operands.
#[cold]
pub fn no_such_overload() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchOverload)
}

/// A fold range (or other iteration source) is not iterable.
#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

/// An identifier is not bound in any activation.
#[cold]
pub fn no_such_attribute(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchAttribute {
        name: name.to_string(),
    })
}

/// A map literal names the same key twice.
#[cold]
pub fn duplicate_map_key(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateMapKey {
        key: key.to_string(),
    })
}

/// A map key is not a primitive value.
#[cold]
pub fn unsupported_key_type(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedKeyType {
        type_name: type_name.to_string(),
    })
}

/// Checked integer arithmetic overflowed.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}
