//!
//! A crate containing labelled transition systems related functionality.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod delta;
mod incoming_transitions;
mod labelled_transition_system;
mod lts;
mod lts_builder;
mod random_lts;

pub use delta::*;
pub use incoming_transitions::*;
pub use labelled_transition_system::*;
pub use lts::*;
pub use lts_builder::*;
pub use random_lts::*;
