//! Vela Value - runtime values for the Vela evaluator.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, `MapValue`, `UnknownSet`)
//! - Capability queries (`Traits`) used by decorators to inspect constants
//! - The hashable key form of primitive values (`ValueKey`)
//! - Evaluation error values (`EvalError`, `EvalErrorKind`) and their factories
//!
//! # Errors Are Values
//!
//! Evaluation never fails out-of-band. A failed operation produces
//! `Value::Error`, and a deliberately missing input produces `Value::Unknown`;
//! both flow through the tree like any other value.
//!
//! # Hashing
//!
//! `Value` deliberately does not implement `Hash`. Only primitive values
//! (bool, int, uint, double, string, bytes) can be used as set or map keys,
//! and the only way to obtain a hashable key is [`Value::to_key`].

mod errors;
mod traits;
mod value;

pub use errors::{EvalError, EvalErrorKind};
pub use traits::Traits;
pub use value::{Heap, MapValue, UnknownSet, Value, ValueIter, ValueKey};

// Re-export error constructors for use by other crates
pub use errors::{
    duplicate_map_key, integer_overflow, no_such_attribute, no_such_overload, not_iterable,
    unsupported_key_type,
};

// Re-export NodeId so downstream users can build unknown sets without a
// direct dependency on vela_ir.
pub use vela_ir::NodeId;
