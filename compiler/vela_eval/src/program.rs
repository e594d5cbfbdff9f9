//! Planned, reusable programs.
//!
//! A [`Program`] owns a decorated tree. Planning happens once; the program
//! is then immutable and may be evaluated any number of times, concurrently,
//! each evaluation with its own activation.

use rayon::prelude::*;
use vela_value::Value;

use crate::activation::Activation;
use crate::decorators::{DecorateError, Pipeline};
use crate::node::Node;
use crate::options::EvalOptions;
use crate::state::SharedEvalState;

/// A decorated tree ready for evaluation.
#[derive(Debug)]
pub struct Program {
    root: Node,
    state: Option<SharedEvalState>,
}

impl Program {
    /// Plan `tree` with the built-in decorators selected by `options`.
    ///
    /// With [`EvalOptions::TRACK_STATE`], the program owns a fresh
    /// [`SharedEvalState`] available through [`state`](Self::state).
    #[tracing::instrument(level = "debug", skip_all, fields(options = ?options, nodes = tree.size()))]
    pub fn new(tree: Node, options: EvalOptions) -> Result<Self, DecorateError> {
        let state = options.tracks_state().then(SharedEvalState::new);
        let root = options.pipeline(state.as_ref()).apply(tree)?;
        tracing::debug!(nodes = root.size(), "program planned");
        Ok(Program { root, state })
    }

    /// Plan `tree` with a caller-supplied pipeline.
    pub fn with_pipeline(tree: Node, pipeline: &Pipeline) -> Result<Self, DecorateError> {
        Ok(Program {
            root: pipeline.apply(tree)?,
            state: None,
        })
    }

    /// The decorated tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Values recorded during evaluation, if state tracking was requested.
    pub fn state(&self) -> Option<&SharedEvalState> {
        self.state.as_ref()
    }

    /// Evaluate against `activation`.
    pub fn eval(&self, activation: &dyn Activation) -> Value {
        self.root.evaluate(activation)
    }

    /// Evaluate against each activation in parallel.
    ///
    /// Results are in the same order as `activations`.
    pub fn eval_batch<A>(&self, activations: &[A]) -> Vec<Value>
    where
        A: Activation + Sync,
    {
        activations
            .par_iter()
            .map(|activation| self.root.evaluate(activation))
            .collect()
    }
}
