//! Domain models for filament inventory and print history

mod filament;
mod history;

pub use filament::*;
pub use history::*;
