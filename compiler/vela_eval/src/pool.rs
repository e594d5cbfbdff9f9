//! Scratch activations for folds.
//!
//! Every fold evaluation needs two short-lived scopes: one binding the
//! accumulator variable and one binding the iteration variable. Allocating
//! fresh scopes per fold is wasteful on hot paths, so the fold borrows
//! reusable slots from an [`ActivationPool`].
//!
//! # Ownership
//!
//! A checked-out slot is owned exclusively by the returned [`Scratch`]
//! guard. The guard clears the slot's value and hands it back to the pool
//! when dropped, which covers early returns and unwinding panics. A slot is
//! never reachable from two guards at once: it is either inside the pool's
//! free list or inside exactly one guard.
//!
//! The pool is shared process-wide ([`ActivationPool::global`]) and is safe
//! to use from concurrent evaluations.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use vela_value::Value;

use crate::activation::Activation;

/// Free slots kept by a default pool. Slots released beyond this are dropped.
const DEFAULT_RETAINED: usize = 64;

static SCRATCH_POOL: ActivationPool = ActivationPool::new();

/// A single reusable binding: one name and, while in use, one value.
#[derive(Debug, Default)]
struct Slot {
    name: String,
    value: Option<Value>,
}

/// Thread-safe pool of scratch binding slots.
pub struct ActivationPool {
    free: Mutex<Vec<Box<Slot>>>,
    max_retained: usize,
    outstanding: AtomicUsize,
}

impl ActivationPool {
    /// Create a pool that retains up to 64 free slots.
    pub const fn new() -> Self {
        Self::with_capacity(DEFAULT_RETAINED)
    }

    /// Create a pool that retains up to `max_retained` free slots.
    pub const fn with_capacity(max_retained: usize) -> Self {
        ActivationPool {
            free: parking_lot::const_mutex(Vec::new()),
            max_retained,
            outstanding: AtomicUsize::new(0),
        }
    }

    /// The process-wide pool used by fold evaluation.
    pub fn global() -> &'static ActivationPool {
        &SCRATCH_POOL
    }

    /// Take a cleared slot bound to `name`.
    ///
    /// The slot holds no value until [`Scratch::set`] is called.
    pub fn checkout(&self, name: &str) -> Scratch<'_> {
        let mut slot = self.free.lock().pop().unwrap_or_default();
        slot.name.clear();
        slot.name.push_str(name);
        slot.value = None;
        self.outstanding.fetch_add(1, Ordering::Relaxed);
        Scratch {
            pool: self,
            slot: Some(slot),
        }
    }

    fn release(&self, mut slot: Box<Slot>) {
        slot.value = None;
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(slot);
        }
    }

    /// Number of slots currently checked out.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Relaxed)
    }

    /// Number of free slots waiting for reuse.
    pub fn retained(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for ActivationPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActivationPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationPool")
            .field("retained", &self.retained())
            .field("max_retained", &self.max_retained)
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

/// RAII guard over a checked-out slot.
///
/// Returns the slot to its pool on drop.
#[must_use = "dropping a Scratch immediately returns its slot to the pool"]
#[derive(Debug)]
pub struct Scratch<'pool> {
    pool: &'pool ActivationPool,
    // Always `Some` until drop.
    slot: Option<Box<Slot>>,
}

impl Scratch<'_> {
    /// The variable name this slot binds.
    pub fn name(&self) -> &str {
        self.slot.as_deref().map_or("", |s| s.name.as_str())
    }

    /// Replace the bound value.
    pub fn set(&mut self, value: Value) {
        if let Some(slot) = self.slot.as_deref_mut() {
            slot.value = Some(value);
        }
    }

    /// The bound value, if one has been set.
    pub fn value(&self) -> Option<&Value> {
        self.slot.as_deref()?.value.as_ref()
    }

    /// A scope that binds this slot's variable over `parent`.
    pub fn scope<'s>(&'s self, parent: &'s dyn Activation) -> ScopedActivation<'s> {
        ScopedActivation {
            name: self.name(),
            value: self.value(),
            parent,
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_addr(&self) -> usize {
        self.slot
            .as_deref()
            .map_or(0, |s| std::ptr::from_ref(s) as usize)
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.pool.release(slot);
        }
    }
}

/// Borrowed view of a scratch slot layered over a parent scope.
#[derive(Clone, Copy)]
pub struct ScopedActivation<'s> {
    name: &'s str,
    value: Option<&'s Value>,
    parent: &'s dyn Activation,
}

impl Activation for ScopedActivation<'_> {
    fn resolve(&self, name: &str) -> Option<Value> {
        match self.value {
            Some(value) if name == self.name => Some(value.clone()),
            _ => self.parent.resolve(name),
        }
    }

    fn parent(&self) -> Option<&dyn Activation> {
        Some(self.parent)
    }
}

#[cfg(test)]
mod tests;
