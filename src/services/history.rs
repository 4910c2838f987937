//! Print history service
//!
//! Records completed prints against inventory. Recording a print consumes
//! the used filament weight; deleting it can restore that weight. Entries
//! are immutable: a revision replaces the entry with a `version + 1`
//! successor after moving the weight bookkeeping to the new values.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::gcode::GCodeMetrics;
use crate::models::PrintHistoryEntry;
use crate::pricing::CostBreakdown;
use crate::services::InventoryService;

/// Input for recording a completed print
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPrintInput {
    pub filament_id: Uuid,
    pub print_name: String,
    pub metrics: GCodeMetrics,
    pub breakdown: CostBreakdown,
    pub notes: Option<String>,
    pub gcode_file: Option<String>,
}

/// In-memory store of print history entries
#[derive(Debug, Default)]
pub struct HistoryService {
    prints: Vec<PrintHistoryEntry>,
}

impl HistoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a print, deducting the used weight from its filament
    pub fn record_print(
        &mut self,
        inventory: &mut InventoryService,
        input: RecordPrintInput,
    ) -> AppResult<PrintHistoryEntry> {
        if input.print_name.trim().is_empty() {
            return Err(AppError::invalid_input("print_name", "must not be empty"));
        }
        inventory.consume(input.filament_id, input.metrics.filament_weight_g)?;
        let entry = PrintHistoryEntry {
            id: Uuid::new_v4(),
            filament_id: input.filament_id,
            print_name: input.print_name,
            metrics: input.metrics,
            breakdown: input.breakdown,
            notes: input.notes,
            gcode_file: input.gcode_file,
            version: 1,
            created_at: Utc::now(),
        };
        tracing::debug!(print = %entry.id, filament = %entry.filament_id, "print recorded");
        self.prints.push(entry.clone());
        Ok(entry)
    }

    pub fn get(&self, print_id: Uuid) -> Option<&PrintHistoryEntry> {
        self.prints.iter().find(|p| p.id == print_id)
    }

    /// All prints, newest first
    pub fn entries(&self) -> Vec<&PrintHistoryEntry> {
        // Reverse insertion order first so that equal timestamps still
        // come out newest-first under the stable sort.
        let mut entries: Vec<_> = self.prints.iter().rev().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Prints for one filament, newest first
    pub fn for_filament(&self, filament_id: Uuid) -> Vec<&PrintHistoryEntry> {
        let mut entries: Vec<_> = self
            .prints
            .iter()
            .rev()
            .filter(|p| p.filament_id == filament_id)
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Delete a print, optionally restoring its weight to the filament
    pub fn delete_print(
        &mut self,
        inventory: &mut InventoryService,
        print_id: Uuid,
        restore_weight: bool,
    ) -> AppResult<()> {
        let entry = self
            .get(print_id)
            .ok_or_else(|| AppError::NotFound("Print".to_string()))?
            .clone();
        if restore_weight {
            // The filament may have been deleted since; that is not an error
            // for history cleanup.
            if inventory.filament(entry.filament_id).is_some() {
                inventory.restore(entry.filament_id, entry.metrics.filament_weight_g)?;
            } else {
                tracing::warn!(
                    print = %print_id,
                    filament = %entry.filament_id,
                    "filament gone, weight not restored"
                );
            }
        }
        self.prints.retain(|p| p.id != print_id);
        Ok(())
    }

    /// Replace a print with a new version
    ///
    /// The old entry's weight goes back to its filament, the new input's
    /// weight is consumed (possibly from a different spool), and the entry
    /// is replaced wholesale with the version counter bumped. On any
    /// failure the old deduction is re-applied and the history unchanged.
    pub fn revise_print(
        &mut self,
        inventory: &mut InventoryService,
        print_id: Uuid,
        input: RecordPrintInput,
    ) -> AppResult<PrintHistoryEntry> {
        if input.print_name.trim().is_empty() {
            return Err(AppError::invalid_input("print_name", "must not be empty"));
        }
        let index = self
            .prints
            .iter()
            .position(|p| p.id == print_id)
            .ok_or_else(|| AppError::NotFound("Print".to_string()))?;
        let old = self.prints[index].clone();

        inventory.restore(old.filament_id, old.metrics.filament_weight_g)?;
        if let Err(e) = inventory.consume(input.filament_id, input.metrics.filament_weight_g) {
            // Roll the restoration back so inventory matches history again
            inventory.consume(old.filament_id, old.metrics.filament_weight_g)?;
            return Err(e);
        }

        let entry = PrintHistoryEntry {
            id: old.id,
            filament_id: input.filament_id,
            print_name: input.print_name,
            metrics: input.metrics,
            breakdown: input.breakdown,
            notes: input.notes,
            gcode_file: input.gcode_file,
            version: old.version + 1,
            created_at: Utc::now(),
        };
        self.prints[index] = entry.clone();
        Ok(entry)
    }
}
