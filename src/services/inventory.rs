//! Inventory service for filament spools and brands
//!
//! Brand names are stored uppercase and unique. Filament weights are net:
//! when a spool is weighed with its tare, the brand's spool weight is
//! subtracted on the way in.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Brand, FilamentRecord, DEFAULT_SPOOL_WEIGHT_G};
use crate::types::normalize_material;
use crate::validation::{validate_brand_name, validate_hex_color, validate_spool_weight};

/// Input for adding or updating a filament spool
#[derive(Debug, Clone, Deserialize)]
pub struct FilamentInput {
    /// Hex color code, e.g. "#FF0000"
    pub color: String,
    pub brand: String,
    pub material: String,
    pub price_per_kg: Decimal,
    /// Weight as measured; gross (spool included) unless `without_spool`
    pub weight_g: Decimal,
    /// The measured weight is net filament, no tare to subtract
    pub without_spool: bool,
}

/// In-memory store of brands and filament spools
#[derive(Debug, Default)]
pub struct InventoryService {
    brands: Vec<Brand>,
    filaments: Vec<FilamentRecord>,
}

impl InventoryService {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Brands
    // ------------------------------------------------------------------

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn brand_by_id(&self, brand_id: Uuid) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == brand_id)
    }

    /// Spool tare for a brand, falling back to the common 150 g spool
    pub fn spool_weight_for(&self, brand_name: &str) -> Decimal {
        self.brands
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(brand_name))
            .map(|b| b.spool_weight_g)
            .unwrap_or_else(|| Decimal::from(DEFAULT_SPOOL_WEIGHT_G))
    }

    pub fn add_brand(&mut self, name: &str, spool_weight_g: Decimal) -> AppResult<Brand> {
        validate_brand_name(name).map_err(|m| AppError::invalid_input("name", m))?;
        validate_spool_weight(spool_weight_g)
            .map_err(|m| AppError::invalid_input("spool_weight_g", m))?;
        let name = name.to_uppercase();
        if self.brands.iter().any(|b| b.name == name) {
            return Err(AppError::DuplicateBrand(name));
        }
        let brand = Brand {
            id: Uuid::new_v4(),
            name,
            spool_weight_g,
            created_at: Utc::now(),
            updated_at: None,
        };
        tracing::debug!(brand = %brand.name, "brand added");
        self.brands.push(brand.clone());
        Ok(brand)
    }

    pub fn update_brand(
        &mut self,
        brand_id: Uuid,
        name: &str,
        spool_weight_g: Decimal,
    ) -> AppResult<Brand> {
        validate_brand_name(name).map_err(|m| AppError::invalid_input("name", m))?;
        validate_spool_weight(spool_weight_g)
            .map_err(|m| AppError::invalid_input("spool_weight_g", m))?;
        let name = name.to_uppercase();
        if self
            .brands
            .iter()
            .any(|b| b.id != brand_id && b.name == name)
        {
            return Err(AppError::DuplicateBrand(name));
        }
        let brand = self
            .brands
            .iter_mut()
            .find(|b| b.id == brand_id)
            .ok_or_else(|| AppError::NotFound("Brand".to_string()))?;
        brand.name = name;
        brand.spool_weight_g = spool_weight_g;
        brand.updated_at = Some(Utc::now());
        Ok(brand.clone())
    }

    /// Delete a brand; rejected while any filament still references it
    pub fn delete_brand(&mut self, brand_id: Uuid) -> AppResult<()> {
        let brand = self
            .brand_by_id(brand_id)
            .ok_or_else(|| AppError::NotFound("Brand".to_string()))?;
        let name = brand.name.clone();
        if self
            .filaments
            .iter()
            .any(|f| f.brand.eq_ignore_ascii_case(&name))
        {
            return Err(AppError::BrandInUse(name));
        }
        self.brands.retain(|b| b.id != brand_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Filaments
    // ------------------------------------------------------------------

    pub fn filaments(&self) -> &[FilamentRecord] {
        &self.filaments
    }

    pub fn filament(&self, filament_id: Uuid) -> Option<&FilamentRecord> {
        self.filaments.iter().find(|f| f.id == filament_id)
    }

    /// Net filament weight for an input, subtracting the brand tare when
    /// the spool was weighed gross
    fn net_weight(&self, input: &FilamentInput) -> AppResult<(Decimal, Decimal)> {
        if input.without_spool {
            if input.weight_g <= Decimal::ZERO {
                return Err(AppError::invalid_input("weight_g", "must be positive"));
            }
            return Ok((input.weight_g, Decimal::ZERO));
        }
        let spool = self.spool_weight_for(&input.brand);
        let net = input.weight_g - spool;
        if net <= Decimal::ZERO {
            return Err(AppError::invalid_input(
                "weight_g",
                format!(
                    "gross weight {} g does not exceed the {} g spool tare",
                    input.weight_g, spool
                ),
            ));
        }
        Ok((net, spool))
    }

    pub fn add_filament(&mut self, input: FilamentInput) -> AppResult<FilamentRecord> {
        validate_hex_color(&input.color).map_err(|m| AppError::invalid_input("color", m))?;
        validate_brand_name(&input.brand).map_err(|m| AppError::invalid_input("brand", m))?;
        if input.price_per_kg <= Decimal::ZERO {
            return Err(AppError::invalid_input("price_per_kg", "must be positive"));
        }
        let (net, spool) = self.net_weight(&input)?;
        let filament = FilamentRecord {
            id: Uuid::new_v4(),
            brand: input.brand.to_uppercase(),
            material: normalize_material(&input.material),
            color: input.color,
            price_per_kg: input.price_per_kg,
            spool_weight_g: spool,
            initial_weight_g: net,
            remaining_weight_g: net,
            created_at: Utc::now(),
        };
        tracing::debug!(filament = %filament.id, brand = %filament.brand, "filament added");
        self.filaments.push(filament.clone());
        Ok(filament)
    }

    /// Update a filament; the remaining weight shifts by the same amount
    /// as the initial weight, clamped at zero
    pub fn update_filament(
        &mut self,
        filament_id: Uuid,
        input: FilamentInput,
    ) -> AppResult<FilamentRecord> {
        validate_hex_color(&input.color).map_err(|m| AppError::invalid_input("color", m))?;
        validate_brand_name(&input.brand).map_err(|m| AppError::invalid_input("brand", m))?;
        if input.price_per_kg <= Decimal::ZERO {
            return Err(AppError::invalid_input("price_per_kg", "must be positive"));
        }
        let (net, spool) = self.net_weight(&input)?;
        let filament = self
            .filaments
            .iter_mut()
            .find(|f| f.id == filament_id)
            .ok_or_else(|| AppError::NotFound("Filament".to_string()))?;
        let shift = net - filament.initial_weight_g;
        filament.brand = input.brand.to_uppercase();
        filament.material = normalize_material(&input.material);
        filament.color = input.color;
        filament.price_per_kg = input.price_per_kg;
        filament.spool_weight_g = spool;
        filament.initial_weight_g = net;
        filament.remaining_weight_g =
            (filament.remaining_weight_g + shift).max(Decimal::ZERO);
        Ok(filament.clone())
    }

    pub fn delete_filament(&mut self, filament_id: Uuid) -> AppResult<()> {
        let before = self.filaments.len();
        self.filaments.retain(|f| f.id != filament_id);
        if self.filaments.len() == before {
            return Err(AppError::NotFound("Filament".to_string()));
        }
        Ok(())
    }

    /// Deduct used weight from a spool
    pub fn consume(&mut self, filament_id: Uuid, weight_g: Decimal) -> AppResult<()> {
        let filament = self
            .filaments
            .iter_mut()
            .find(|f| f.id == filament_id)
            .ok_or_else(|| AppError::NotFound("Filament".to_string()))?;
        if filament.remaining_weight_g < weight_g {
            return Err(AppError::InsufficientFilament {
                available_g: filament.remaining_weight_g,
                requested_g: weight_g,
            });
        }
        filament.remaining_weight_g -= weight_g;
        tracing::debug!(
            filament = %filament_id,
            used_g = %weight_g,
            remaining_g = %filament.remaining_weight_g,
            "filament consumed"
        );
        Ok(())
    }

    /// Return previously deducted weight to a spool
    pub fn restore(&mut self, filament_id: Uuid, weight_g: Decimal) -> AppResult<()> {
        let filament = self
            .filaments
            .iter_mut()
            .find(|f| f.id == filament_id)
            .ok_or_else(|| AppError::NotFound("Filament".to_string()))?;
        filament.remaining_weight_g += weight_g;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petg_input(brand: &str, weight_g: i64, without_spool: bool) -> FilamentInput {
        FilamentInput {
            color: "#FF8800".to_string(),
            brand: brand.to_string(),
            material: "petg".to_string(),
            price_per_kg: Decimal::from(90),
            weight_g: Decimal::from(weight_g),
            without_spool,
        }
    }

    #[test]
    fn test_brand_names_are_uppercased_and_unique() {
        let mut inventory = InventoryService::new();
        let brand = inventory.add_brand("Prusament", Decimal::from(200)).unwrap();
        assert_eq!(brand.name, "PRUSAMENT");
        assert_eq!(
            inventory.add_brand("prusament", Decimal::from(180)).unwrap_err(),
            AppError::DuplicateBrand("PRUSAMENT".to_string())
        );
    }

    #[test]
    fn test_gross_weight_subtracts_spool_tare() {
        let mut inventory = InventoryService::new();
        inventory.add_brand("PRUSAMENT", Decimal::from(200)).unwrap();
        let filament = inventory
            .add_filament(petg_input("PRUSAMENT", 1200, false))
            .unwrap();
        assert_eq!(filament.initial_weight_g, Decimal::from(1000));
        assert_eq!(filament.remaining_weight_g, Decimal::from(1000));
        assert_eq!(filament.spool_weight_g, Decimal::from(200));
        assert_eq!(filament.material, "PETG");
    }

    #[test]
    fn test_unknown_brand_uses_default_tare() {
        let inventory = InventoryService::new();
        assert_eq!(
            inventory.spool_weight_for("NONAME"),
            Decimal::from(DEFAULT_SPOOL_WEIGHT_G)
        );
    }

    #[test]
    fn test_gross_weight_below_tare_is_rejected() {
        let mut inventory = InventoryService::new();
        inventory.add_brand("PRUSAMENT", Decimal::from(200)).unwrap();
        let err = inventory
            .add_filament(petg_input("PRUSAMENT", 150, false))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[test]
    fn test_without_spool_keeps_weight_as_net() {
        let mut inventory = InventoryService::new();
        let filament = inventory
            .add_filament(petg_input("NONAME", 850, true))
            .unwrap();
        assert_eq!(filament.initial_weight_g, Decimal::from(850));
        assert_eq!(filament.spool_weight_g, Decimal::ZERO);
    }

    #[test]
    fn test_consume_and_restore() {
        let mut inventory = InventoryService::new();
        let filament = inventory
            .add_filament(petg_input("NONAME", 100, true))
            .unwrap();
        inventory.consume(filament.id, Decimal::from(40)).unwrap();
        assert_eq!(
            inventory.filament(filament.id).unwrap().remaining_weight_g,
            Decimal::from(60)
        );
        let err = inventory.consume(filament.id, Decimal::from(61)).unwrap_err();
        assert_eq!(
            err,
            AppError::InsufficientFilament {
                available_g: Decimal::from(60),
                requested_g: Decimal::from(61),
            }
        );
        inventory.restore(filament.id, Decimal::from(40)).unwrap();
        assert_eq!(
            inventory.filament(filament.id).unwrap().remaining_weight_g,
            Decimal::from(100)
        );
    }

    #[test]
    fn test_update_filament_shifts_remaining_weight() {
        let mut inventory = InventoryService::new();
        let filament = inventory
            .add_filament(petg_input("NONAME", 1000, true))
            .unwrap();
        inventory.consume(filament.id, Decimal::from(300)).unwrap();
        // Re-weigh: initial goes 1000 -> 900, remaining follows 700 -> 600
        let updated = inventory
            .update_filament(filament.id, petg_input("NONAME", 900, true))
            .unwrap();
        assert_eq!(updated.initial_weight_g, Decimal::from(900));
        assert_eq!(updated.remaining_weight_g, Decimal::from(600));
    }

    #[test]
    fn test_delete_brand_in_use_is_rejected() {
        let mut inventory = InventoryService::new();
        let brand = inventory.add_brand("PRUSAMENT", Decimal::from(200)).unwrap();
        inventory
            .add_filament(petg_input("PRUSAMENT", 1200, false))
            .unwrap();
        assert_eq!(
            inventory.delete_brand(brand.id).unwrap_err(),
            AppError::BrandInUse("PRUSAMENT".to_string())
        );
    }

    #[test]
    fn test_delete_missing_filament() {
        let mut inventory = InventoryService::new();
        assert_eq!(
            inventory.delete_filament(Uuid::new_v4()).unwrap_err(),
            AppError::NotFound("Filament".to_string())
        );
    }
}
