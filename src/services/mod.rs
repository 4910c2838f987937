//! Stateful collaborators around the calculation core
//!
//! The extraction/conversion/calculation functions are pure; these
//! services own the mutable inventory and history state the shell
//! persists between sessions.

mod history;
mod inventory;

pub use history::*;
pub use inventory::*;
