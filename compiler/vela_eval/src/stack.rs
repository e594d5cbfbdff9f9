//! Stack growth for recursive evaluation and decoration.
//!
//! Trees produced by real expressions can nest deeply (long `||` chains,
//! nested comprehensions). Both the evaluator and the decorator pipeline
//! recurse over the tree, so every recursive step goes through
//! [`ensure_sufficient_stack`].
//!
//! On WASM, where `stacker` is unavailable, the closure runs directly.

/// Run `f`, growing the stack first if the remaining space is low.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Keep this much stack free before recursing (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Size of each newly allocated stack segment (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
