//! Test suites spanning several modules.
//!
//! Unit tests for a single module live next to it (`foo/tests.rs`); the
//! suites here exercise decorated trees end to end.

mod exhaustive_tests;
