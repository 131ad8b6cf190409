//! Utility types and functions for the simrel crates.
//!
//! Forbid unsafe code in this crate.
#![forbid(unsafe_code)]

mod tagged_index;

pub use random_test::*;
pub use tagged_index::*;
