//! Validation utilities for inventory records

use rust_decimal::Decimal;

use crate::models::FilamentRecord;

/// Validate a hex color code ("#RGB" or "#RRGGBB")
pub fn validate_hex_color(color: &str) -> Result<(), &'static str> {
    let Some(digits) = color.strip_prefix('#') else {
        return Err("Color must start with '#'");
    };
    if digits.len() != 3 && digits.len() != 6 {
        return Err("Color must be #RGB or #RRGGBB");
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must be hexadecimal");
    }
    Ok(())
}

/// Validate a brand name (1-40 characters, no leading/trailing whitespace)
pub fn validate_brand_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Brand name must not be empty");
    }
    if name.len() > 40 {
        return Err("Brand name must be at most 40 characters");
    }
    if name.trim() != name {
        return Err("Brand name must not have surrounding whitespace");
    }
    Ok(())
}

/// Validate a spool tare weight
pub fn validate_spool_weight(weight_g: Decimal) -> Result<(), &'static str> {
    if weight_g <= Decimal::ZERO {
        return Err("Spool weight must be positive");
    }
    Ok(())
}

/// Validate a filament record's fields
pub fn validate_filament(filament: &FilamentRecord) -> Result<(), &'static str> {
    validate_hex_color(&filament.color)?;
    validate_brand_name(&filament.brand)?;
    if filament.material.is_empty() {
        return Err("Material must not be empty");
    }
    if filament.price_per_kg <= Decimal::ZERO {
        return Err("Price per kg must be positive");
    }
    if filament.initial_weight_g <= Decimal::ZERO {
        return Err("Initial weight must be positive");
    }
    if filament.remaining_weight_g < Decimal::ZERO {
        return Err("Remaining weight must not be negative");
    }
    if filament.remaining_weight_g > filament.initial_weight_g {
        return Err("Remaining weight cannot exceed initial weight");
    }
    Ok(())
}
