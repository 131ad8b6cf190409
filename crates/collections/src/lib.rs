//! Various collections implemented for the simrel crates.
//!
//! Forbid unsafe code in this crate.
#![forbid(unsafe_code)]

mod binary_relation;
mod counted_set;
mod shared_list;

pub use binary_relation::*;
pub use counted_set::*;
pub use shared_list::*;
