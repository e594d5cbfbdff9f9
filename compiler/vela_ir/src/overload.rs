//! Resolved binary overloads.
//!
//! The type-checker binds each binary call to a concrete overload before the
//! tree reaches the evaluator. The tag is what decorators pattern-match on:
//! the optimizer, for instance, only rewrites `InList` calls.

use std::fmt;

/// A resolved binary overload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Overload {
    // Arithmetic
    Add,
    Subtract,
    Multiply,

    // Comparison
    Equals,
    NotEquals,
    Less,
    Greater,

    // Membership
    /// `value in list`.
    InList,
    /// `key in map`.
    InMap,
}

impl Overload {
    /// Returns the stable overload id used in diagnostics and traces.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Less => "less",
            Self::Greater => "greater",
            Self::InList => "in_list",
            Self::InMap => "in_map",
        }
    }

    /// Returns the source-level symbol for this overload.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::InList | Self::InMap => "in",
        }
    }

    /// Returns `true` for the `in` overloads.
    #[inline]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::InList | Self::InMap)
    }
}

impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
