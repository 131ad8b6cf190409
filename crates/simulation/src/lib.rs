#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod block;
mod compute_simulation;
mod options;
mod partition;
mod simulation;
mod state_list;
mod successor_counter;
mod validate;

pub use block::*;
pub use compute_simulation::*;
pub use options::*;
pub use partition::*;
pub use simulation::*;
pub use state_list::*;
pub use successor_counter::*;
pub use validate::*;
