//! Program planning options.
//!
//! [`EvalOptions`] selects which built-in decorators a [`crate::Program`]
//! installs. The decorators always run in the same order, regardless of the
//! order flags were combined in:
//!
//! 1. exhaustive evaluation, so later decorators see the exhaustive twins
//! 2. optimization, so constant literals are folded before being observed
//! 3. state tracking, outermost, so it records what actually runs

use bitflags::bitflags;

use crate::decorators::{DisableShortCircuits, Optimize, Pipeline};
use crate::state::{track_state, SharedEvalState};

bitflags! {
    /// Built-in decorators to install when planning a program.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EvalOptions: u8 {
        /// Fold constant literals and plan hash-based membership tests.
        const OPTIMIZE        = 1 << 0;
        /// Evaluate every operand of `||`, `&&`, the ternary, and folds.
        const EXHAUSTIVE_EVAL = 1 << 1;
        /// Record every node's value in the program's state.
        const TRACK_STATE     = 1 << 2;
    }
}

impl EvalOptions {
    #[inline]
    pub fn optimizes(self) -> bool {
        self.contains(Self::OPTIMIZE)
    }

    #[inline]
    pub fn exhaustive(self) -> bool {
        self.contains(Self::EXHAUSTIVE_EVAL)
    }

    #[inline]
    pub fn tracks_state(self) -> bool {
        self.contains(Self::TRACK_STATE)
    }

    /// The decorator pipeline these options select.
    ///
    /// `state` receives tracked values; it is ignored unless
    /// [`TRACK_STATE`](Self::TRACK_STATE) is set.
    pub fn pipeline(self, state: Option<&SharedEvalState>) -> Pipeline {
        let mut pipeline = Pipeline::new();
        if self.exhaustive() {
            pipeline.push(DisableShortCircuits);
        }
        if self.optimizes() {
            pipeline.push(Optimize);
        }
        if let Some(state) = state.filter(|_| self.tracks_state()) {
            pipeline.push(track_state(state));
        }
        pipeline
    }
}
