//! Vela IR - identifiers shared by every stage of the evaluator.
//!
//! This crate holds the small, `Copy` vocabulary that the value model and
//! the interpretable tree both need:
//! - [`NodeId`]: stable identifier tying a tree node back to its source expression
//! - [`Overload`]: the resolved binary overload attached to a `Binary` node
//!
//! Both types are produced by the upstream compiler/type-checker and are
//! treated as opaque, already-valid input by `vela_eval`.

mod node_id;
mod overload;

pub use node_id::NodeId;
pub use overload::Overload;
