//! Sets of unknown expression ids.
//!
//! An unknown value records which expressions could not be evaluated because
//! their inputs were deliberately withheld. The set is kept sorted and
//! de-duplicated so equality is structural.

use std::fmt;

use smallvec::SmallVec;
use vela_ir::NodeId;

/// Sorted, de-duplicated set of node ids whose values are unknown.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnknownSet {
    ids: SmallVec<[NodeId; 2]>,
}

impl UnknownSet {
    /// A set naming a single expression.
    pub fn new(id: NodeId) -> Self {
        let mut ids = SmallVec::new();
        ids.push(id);
        UnknownSet { ids }
    }

    /// Build a set from arbitrary ids.
    pub fn from_ids(ids: impl IntoIterator<Item = NodeId>) -> Self {
        let mut ids: SmallVec<[NodeId; 2]> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        UnknownSet { ids }
    }

    /// The ids in ascending order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl fmt::Display for UnknownSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "}}")
    }
}
