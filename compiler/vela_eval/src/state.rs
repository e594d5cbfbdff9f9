//! Recorded evaluation state.
//!
//! [`EvalState`] maps node ids to the last value each node produced. It is
//! filled by an [`ObserveEval`] decorator built with [`track_state`] and read
//! back after evaluation, e.g. to explain why a condition came out the way
//! it did.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use vela_ir::NodeId;
use vela_value::Value;

use crate::decorators::ObserveEval;

/// Last value observed for each node id.
#[derive(Clone, Debug, Default)]
pub struct EvalState {
    values: FxHashMap<NodeId, Value>,
}

impl EvalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `id`, replacing any earlier value.
    pub fn record(&mut self, id: NodeId, value: Value) {
        self.values.insert(id, value);
    }

    pub fn value(&self, id: NodeId) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Recorded ids in ascending order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.values.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forget all recorded values.
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Thread-safe shared [`EvalState`].
///
/// Uses `Arc<RwLock<_>>` so the observer installed in a tree and the caller
/// inspecting results see the same state.
pub struct SharedEvalState(Arc<parking_lot::RwLock<EvalState>>);

impl SharedEvalState {
    pub fn new() -> Self {
        SharedEvalState(Arc::new(parking_lot::RwLock::new(EvalState::new())))
    }

    /// Get read access to the state.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, EvalState> {
        self.0.read()
    }

    /// Get write access to the state.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, EvalState> {
        self.0.write()
    }

    /// The recorded value for `id`, cloned out of the lock.
    pub fn value(&self, id: NodeId) -> Option<Value> {
        self.read().value(id).cloned()
    }

    pub fn reset(&self) {
        self.write().reset();
    }
}

impl Default for SharedEvalState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SharedEvalState {
    fn clone(&self) -> Self {
        SharedEvalState(Arc::clone(&self.0))
    }
}

impl fmt::Debug for SharedEvalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedEvalState({:?})", &*self.0.read())
    }
}

/// An observer decorator that records every value into `state`.
pub fn track_state(state: &SharedEvalState) -> ObserveEval {
    let state = state.clone();
    ObserveEval::new(move |id, value| state.write().record(id, value.clone()))
}
