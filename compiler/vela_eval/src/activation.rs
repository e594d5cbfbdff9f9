//! Variable-binding contexts for evaluation.
//!
//! An activation resolves identifiers. Activations chain: a child scope is
//! consulted first and falls back to its parent, so inner bindings shadow
//! outer ones. Top-level activations are built by the caller per evaluation;
//! the short-lived scopes a fold needs come from the scratch pool
//! ([`crate::pool`]).

use rustc_hash::{FxHashMap, FxHashSet};
use vela_value::Value;

/// Resolves variable names during evaluation.
pub trait Activation {
    /// Look up `name` in this scope, then in its ancestors.
    fn resolve(&self, name: &str) -> Option<Value>;

    /// The enclosing scope, if any.
    fn parent(&self) -> Option<&dyn Activation>;

    /// Whether `name` is deliberately withheld (partial evaluation).
    ///
    /// Only consulted after `resolve` fails, so a binding in an inner scope
    /// always wins over an outer unknown declaration.
    fn is_unknown(&self, name: &str) -> bool {
        self.parent().is_some_and(|p| p.is_unknown(name))
    }
}

/// Activation with no bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyActivation;

impl Activation for EmptyActivation {
    #[inline]
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }

    #[inline]
    fn parent(&self) -> Option<&dyn Activation> {
        None
    }
}

/// Activation backed by an owned map of bindings.
#[derive(Clone, Debug, Default)]
pub struct MapActivation {
    bindings: FxHashMap<String, Value>,
}

impl MapActivation {
    /// Create an empty activation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Builder form of [`bind`](Self::bind).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bind(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for MapActivation {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        MapActivation {
            bindings: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Activation for MapActivation {
    #[inline]
    fn resolve(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    #[inline]
    fn parent(&self) -> Option<&dyn Activation> {
        None
    }
}

/// A child scope layered over a parent scope.
#[derive(Clone, Copy)]
pub struct HierarchicalActivation<'a> {
    parent: &'a dyn Activation,
    child: &'a dyn Activation,
}

impl<'a> HierarchicalActivation<'a> {
    pub fn new(parent: &'a dyn Activation, child: &'a dyn Activation) -> Self {
        HierarchicalActivation { parent, child }
    }
}

impl Activation for HierarchicalActivation<'_> {
    fn resolve(&self, name: &str) -> Option<Value> {
        match self.child.resolve(name) {
            Some(value) => Some(value),
            // A name the child withholds stays withheld.
            None if self.child.is_unknown(name) => None,
            None => self.parent.resolve(name),
        }
    }

    fn parent(&self) -> Option<&dyn Activation> {
        Some(self.parent)
    }

    fn is_unknown(&self, name: &str) -> bool {
        self.child.is_unknown(name) || self.parent.is_unknown(name)
    }
}

/// Bindings plus a set of names whose values are withheld.
///
/// Identifiers naming an unknown variable evaluate to `Value::Unknown`
/// carrying the identifier's node id, instead of a missing-attribute error.
/// An unknown declaration takes precedence over a binding of the same name
/// in this activation.
#[derive(Clone, Debug, Default)]
pub struct PartialActivation {
    bindings: MapActivation,
    unknowns: FxHashSet<String>,
}

impl PartialActivation {
    pub fn new(bindings: MapActivation) -> Self {
        PartialActivation {
            bindings,
            unknowns: FxHashSet::default(),
        }
    }

    /// Declare `name` unknown.
    #[must_use]
    pub fn with_unknown(mut self, name: impl Into<String>) -> Self {
        self.unknowns.insert(name.into());
        self
    }
}

impl Activation for PartialActivation {
    fn resolve(&self, name: &str) -> Option<Value> {
        if self.unknowns.contains(name) {
            return None;
        }
        self.bindings.resolve(name)
    }

    fn parent(&self) -> Option<&dyn Activation> {
        None
    }

    fn is_unknown(&self, name: &str) -> bool {
        self.unknowns.contains(name)
    }
}
