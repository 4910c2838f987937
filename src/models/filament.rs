//! Filament inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Empty-spool tare used when a brand does not specify one
pub const DEFAULT_SPOOL_WEIGHT_G: i64 = 150;

/// A filament brand with its empty-spool weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    /// Uppercase, unique within the inventory
    pub name: String,
    pub spool_weight_g: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A spool of filament tracked in inventory
///
/// Weights are net (filament only, spool tare excluded). The calculator
/// reads this record but never mutates it; weight deduction goes through
/// the inventory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilamentRecord {
    pub id: Uuid,
    pub brand: String,
    /// Material name, normalized uppercase (PLA, PETG, ...)
    pub material: String,
    /// Hex color code, e.g. "#FF0000"
    pub color: String,
    /// Price in the base currency per kilogram of filament
    pub price_per_kg: Decimal,
    /// Tare of the spool this filament came on; zero when tracked without spool
    pub spool_weight_g: Decimal,
    pub initial_weight_g: Decimal,
    pub remaining_weight_g: Decimal,
    pub created_at: DateTime<Utc>,
}

impl FilamentRecord {
    /// Fraction of the spool still available, in percent
    pub fn remaining_percent(&self) -> Decimal {
        if self.initial_weight_g.is_zero() {
            return Decimal::ZERO;
        }
        self.remaining_weight_g / self.initial_weight_g * Decimal::ONE_HUNDRED
    }

    pub fn has_at_least(&self, weight_g: Decimal) -> bool {
        self.remaining_weight_g >= weight_g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spool(initial: i64, remaining: i64) -> FilamentRecord {
        FilamentRecord {
            id: Uuid::new_v4(),
            brand: "PRUSAMENT".to_string(),
            material: "PETG".to_string(),
            color: "#FF8800".to_string(),
            price_per_kg: Decimal::from(90),
            spool_weight_g: Decimal::from(DEFAULT_SPOOL_WEIGHT_G),
            initial_weight_g: Decimal::from(initial),
            remaining_weight_g: Decimal::from(remaining),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_remaining_percent() {
        assert_eq!(spool(1000, 250).remaining_percent(), Decimal::from(25));
        assert_eq!(spool(0, 0).remaining_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_has_at_least() {
        let f = spool(1000, 100);
        assert!(f.has_at_least(Decimal::from(100)));
        assert!(!f.has_at_least(Decimal::from(101)));
    }
}
