//! Filament inventory and print cost calculation engine
//!
//! Core pipeline: sliced G-code text goes through [`gcode::extract`],
//! the resulting metrics combine with a [`models::FilamentRecord`] and a
//! [`config::CalculatorConfig`] in [`pricing::calculate`], and the
//! breakdown comes back in the configured display currency. The
//! [`services`] layer keeps the inventory and print history that the
//! surrounding application persists.

pub mod config;
pub mod currency;
pub mod error;
pub mod gcode;
pub mod models;
pub mod pricing;
pub mod services;
pub mod types;
pub mod validation;

pub use config::*;
pub use currency::{convert, format_amount, round_display, RateTable};
pub use error::*;
pub use gcode::{extract, GCodeMetrics, MetricWarning};
pub use models::*;
pub use pricing::{calculate, CostBreakdown};
pub use services::*;
pub use types::*;
pub use validation::*;
