//! Print history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gcode::GCodeMetrics;
use crate::pricing::CostBreakdown;

/// A completed print recorded against a filament spool
///
/// Entries are immutable once created; editing a print produces a
/// replacement entry with `version + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintHistoryEntry {
    pub id: Uuid,
    pub filament_id: Uuid,
    pub print_name: String,
    /// Metrics of the print as extracted from the sliced G-code
    pub metrics: GCodeMetrics,
    pub breakdown: CostBreakdown,
    pub notes: Option<String>,
    /// Source G-code filename, when known
    pub gcode_file: Option<String>,
    pub version: u32,
    pub created_at: DateTime<Utc>,
}
