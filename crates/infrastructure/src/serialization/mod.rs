//! Deterministic JSON serialization for the session file.
//!
//! Keys are sorted (via `BTreeMap`), indentation is 2 spaces and output ends
//! with a newline, so the file diffs cleanly between writes.

mod json;

pub use json::*;
