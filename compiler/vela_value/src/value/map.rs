//! Map values.
//!
//! Entries keep insertion order (iteration and display are deterministic)
//! and are indexed by `ValueKey` for O(1) lookup.

use rustc_hash::FxHashMap;

use super::{Value, ValueKey};

/// Insertion-ordered map from primitive keys to values.
#[derive(Clone, Debug, Default)]
pub struct MapValue {
    entries: Vec<(ValueKey, Value)>,
    index: FxHashMap<ValueKey, usize>,
}

impl MapValue {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        MapValue {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert a new entry.
    ///
    /// # Errors
    /// Returns the key back if it is already present; the map is unchanged.
    pub fn insert(&mut self, key: ValueKey, value: Value) -> Result<(), ValueKey> {
        if self.index.contains_key(&key) {
            return Err(key);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    /// Look up a value by key.
    #[inline]
    pub fn get(&self, key: &ValueKey) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &ValueKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ValueKey, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ValueKey> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub(super) fn entries(&self) -> &[(ValueKey, Value)] {
        &self.entries
    }
}

/// Order-insensitive equality.
impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}
