//! Print cost calculation
//!
//! Pure function over extracted metrics, filament data and configuration.
//! All arithmetic runs at full `Decimal` precision in the base currency;
//! conversion to the display currency happens once at the end, and
//! rounding only in [`CostBreakdown::rounded`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::currency::{convert, round_display};
use crate::error::{AppError, AppResult};
use crate::gcode::GCodeMetrics;
use crate::models::FilamentRecord;
use crate::types::{Currency, BASE_CURRENCY};

/// Itemized cost of a single print, in the display currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material_cost: Decimal,
    pub energy_cost: Decimal,
    pub labor_cost: Decimal,
    pub setup_fee: Decimal,
    /// material + energy + labor + setup fee
    pub subtotal: Decimal,
    pub risk_amount: Decimal,
    pub margin_amount: Decimal,
    pub vat_amount: Decimal,
    /// subtotal + risk + margin + VAT
    pub total: Decimal,
    pub currency: Currency,
}

impl CostBreakdown {
    /// Copy with every monetary field rounded to two decimals for display
    pub fn rounded(&self) -> CostBreakdown {
        CostBreakdown {
            material_cost: round_display(self.material_cost),
            energy_cost: round_display(self.energy_cost),
            labor_cost: round_display(self.labor_cost),
            setup_fee: round_display(self.setup_fee),
            subtotal: round_display(self.subtotal),
            risk_amount: round_display(self.risk_amount),
            margin_amount: round_display(self.margin_amount),
            vat_amount: round_display(self.vat_amount),
            total: round_display(self.total),
            currency: self.currency,
        }
    }
}

/// Calculate the cost breakdown for one print
///
/// Zero metrics are valid input and produce a near-zero breakdown; a
/// failed extraction degrades gracefully instead of blocking the
/// calculation. Negative config rates and a non-positive filament price
/// are rejected.
pub fn calculate(
    metrics: &GCodeMetrics,
    filament: &FilamentRecord,
    config: &CalculatorConfig,
) -> AppResult<CostBreakdown> {
    if let Some(violation) = config.validate().into_iter().next() {
        return Err(violation.into());
    }
    if filament.price_per_kg <= Decimal::ZERO {
        return Err(AppError::invalid_input(
            "price_per_kg",
            "must be positive",
        ));
    }

    let sixty = Decimal::from(60);
    let print_hours = metrics.estimated_time_minutes / sixty;
    let preheat_hours = config.preheat_time_minutes / sixty;

    let material_cost =
        metrics.filament_weight_g / Decimal::ONE_THOUSAND * filament.price_per_kg;
    let energy_kwh = print_hours * config.printer_power_w / Decimal::ONE_THOUSAND
        + preheat_hours * config.preheat_power_w / Decimal::ONE_THOUSAND;
    let energy_cost = energy_kwh * config.energy_cost_per_kwh;
    let labor_cost = print_hours * config.hourly_rate;

    let subtotal = material_cost + energy_cost + labor_cost + config.setup_fee;
    let risk_amount = subtotal * config.risk_percent / Decimal::ONE_HUNDRED;
    let margin_amount = (subtotal + risk_amount) * config.margin_percent / Decimal::ONE_HUNDRED;
    let vat_amount =
        (subtotal + risk_amount + margin_amount) * config.vat_percent / Decimal::ONE_HUNDRED;
    let total = subtotal + risk_amount + margin_amount + vat_amount;

    let display = |amount: Decimal| -> AppResult<Decimal> {
        convert(amount, BASE_CURRENCY, config.currency, &config.currency_rates)
    };

    Ok(CostBreakdown {
        material_cost: display(material_cost)?,
        energy_cost: display(energy_cost)?,
        labor_cost: display(labor_cost)?,
        setup_fee: display(config.setup_fee)?,
        subtotal: display(subtotal)?,
        risk_amount: display(risk_amount)?,
        margin_amount: display(margin_amount)?,
        vat_amount: display(vat_amount)?,
        total: display(total)?,
        currency: config.currency,
    })
}
