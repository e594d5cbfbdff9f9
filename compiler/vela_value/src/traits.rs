//! Capability traits of runtime values, queried by decorators that inspect
//! constants.

bitflags::bitflags! {
    /// Queryable runtime capabilities of a value.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Traits: u16 {
        /// Supports `+`.
        const ADDER = 1 << 0;
        /// Supports ordering comparisons.
        const COMPARER = 1 << 1;
        /// Supports `in`.
        const CONTAINER = 1 << 2;
        /// Can be iterated by a fold.
        const ITERABLE = 1 << 3;
        /// Ordered, index-addressable sequence.
        const LISTER = 1 << 4;
        /// Key/value lookup.
        const MAPPER = 1 << 5;
        /// Has a size.
        const SIZER = 1 << 6;
    }
}
