//! Iteration over iterable values.

use std::slice;

use super::{Value, ValueKey};

/// Iterator produced by [`Value::iter`].
///
/// Lists yield their elements in order; maps yield their keys in insertion
/// order.
#[derive(Clone, Debug)]
pub enum ValueIter<'a> {
    List(slice::Iter<'a, Value>),
    MapKeys(slice::Iter<'a, (ValueKey, Value)>),
}

impl Iterator for ValueIter<'_> {
    type Item = Value;

    #[inline]
    fn next(&mut self) -> Option<Value> {
        match self {
            ValueIter::List(it) => it.next().cloned(),
            ValueIter::MapKeys(it) => it.next().map(|(k, _)| k.to_value()),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ValueIter::List(it) => it.size_hint(),
            ValueIter::MapKeys(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for ValueIter<'_> {}
