//! Vela Eval - interpretable trees, decorators, and evaluation.
//!
//! This crate provides:
//! - The interpretable tree (`Node`) built by an external planner
//! - Variable-binding contexts (`Activation` and its implementations)
//! - The decorator pipeline (`Pipeline`, `Decorator`) and the built-in
//!   observe, exhaustive-evaluation, and optimization decorators
//! - Planned programs (`Program`) with concurrent batch evaluation
//!
//! # Architecture
//!
//! A tree is planned once: the pipeline rewrites it bottom-up, and the
//! resulting `Program` is immutable. Evaluation takes a shared reference to
//! the tree and a caller-owned activation, so one program serves any number
//! of concurrent evaluations. Folds borrow scratch bindings from a
//! process-wide pool (`ActivationPool`) and return them on every exit path.
//!
//! Evaluation never fails out-of-band: errors and unknowns are values
//! (see `vela_value`).

mod activation;
pub mod decorators;
mod eval;
mod node;
mod operators;
mod options;
mod pool;
mod program;
mod stack;
mod state;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;

pub use activation::{
    Activation, EmptyActivation, HierarchicalActivation, MapActivation, PartialActivation,
};
pub use decorators::{
    observe_eval, DecorateError, Decorator, DisableShortCircuits, ObserveEval, Optimize, Pipeline,
};
pub use node::{
    BinaryNode, ConditionalNode, ConstNode, FoldNode, IdentNode, ListNode, LogicalNode, MapNode,
    Node, Observer, SetMembershipNode, WatchNode,
};
pub use operators::evaluate_binary;
pub use options::EvalOptions;
pub use pool::{ActivationPool, Scratch, ScopedActivation};
pub use program::Program;
pub use state::{track_state, EvalState, SharedEvalState};

pub use vela_ir::{NodeId, Overload};
pub use vela_value::Value;
