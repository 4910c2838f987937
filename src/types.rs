//! Common types used across the engine

use serde::{Deserialize, Serialize};

/// Supported display currencies
///
/// Exchange rates are quoted relative to the base currency ([`BASE_CURRENCY`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Pln,
    Eur,
    Usd,
    Gbp,
}

/// All prices and rates are stored in this currency; conversion to the
/// display currency happens at the breakdown boundary.
pub const BASE_CURRENCY: Currency = Currency::Pln;

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Pln, Currency::Eur, Currency::Usd, Currency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Pln => "PLN",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Pln => "zł",
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    /// Whether the symbol is written before the amount ("$1.50" vs "1.50 zł")
    pub fn symbol_leading(&self) -> bool {
        !matches!(self, Currency::Pln)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Normalize a slicer-reported material name to its canonical form
///
/// Slicers and filenames use a handful of aliases (PET for PETG,
/// POLYCARBONATE for PC). Unknown names pass through uppercased.
pub fn normalize_material(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "PET" => "PETG".to_string(),
        "POLYCARBONATE" => "PC".to_string(),
        _ => upper,
    }
}

/// Material names recognized in slicer metadata and filenames
pub const KNOWN_MATERIALS: &[&str] = &[
    "PETG", "PLA", "ABS", "ASA", "PP", "TPU", "NYLON", "PA", "PC",
];
