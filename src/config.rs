//! Calculation parameters with defaults and validation
//!
//! A `CalculatorConfig` is an explicit value passed into every calculation
//! call; the engine holds no process-wide settings. The surrounding shell
//! persists it as JSON; missing fields fill in from defaults on load.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::RateTable;
use crate::error::{AppError, AppResult};
use crate::types::{Currency, BASE_CURRENCY};

/// Pricing and energy parameters for the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Machine rate per hour of print time, in the base currency
    pub hourly_rate: Decimal,
    pub energy_cost_per_kwh: Decimal,
    pub printer_power_w: Decimal,
    /// Heat-up phase added to the energy bill, not to machine time
    pub preheat_time_minutes: Decimal,
    pub preheat_power_w: Decimal,
    /// Flat fee added to every job
    pub setup_fee: Decimal,
    /// Surcharge covering failed prints, in percent of the subtotal
    pub risk_percent: Decimal,
    pub margin_percent: Decimal,
    pub vat_percent: Decimal,
    /// Currency the breakdown is reported in
    pub currency: Currency,
    pub currency_rates: RateTable,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::from(5),
            energy_cost_per_kwh: Decimal::new(80, 2),
            printer_power_w: Decimal::from(130),
            preheat_time_minutes: Decimal::from(5),
            preheat_power_w: Decimal::from(200),
            setup_fee: Decimal::ZERO,
            risk_percent: Decimal::ZERO,
            margin_percent: Decimal::from(10),
            vat_percent: Decimal::from(23),
            currency: Currency::Pln,
            currency_rates: default_rates(),
        }
    }
}

/// Default exchange rates, quoted per one PLN
pub fn default_rates() -> RateTable {
    HashMap::from([
        (Currency::Pln, Decimal::ONE),
        (Currency::Eur, Decimal::new(23, 2)),
        (Currency::Usd, Decimal::new(25, 2)),
        (Currency::Gbp, Decimal::new(20, 2)),
    ])
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<ConfigViolation> for AppError {
    fn from(violation: ConfigViolation) -> Self {
        AppError::InvalidInput {
            field: violation.field.to_string(),
            message: violation.message,
        }
    }
}

impl CalculatorConfig {
    /// Deserialize a configuration, filling any missing field from defaults
    pub fn load(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::invalid_input("config", e.to_string()))
    }

    /// Check every field, returning all violations
    ///
    /// Margin, VAT and risk percentages above 100 are allowed — extreme
    /// values are a user choice. Negative values are not.
    pub fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        let non_negative: [(&'static str, Decimal); 8] = [
            ("hourly_rate", self.hourly_rate),
            ("energy_cost_per_kwh", self.energy_cost_per_kwh),
            ("printer_power_w", self.printer_power_w),
            ("preheat_time_minutes", self.preheat_time_minutes),
            ("preheat_power_w", self.preheat_power_w),
            ("setup_fee", self.setup_fee),
            ("margin_percent", self.margin_percent),
            ("vat_percent", self.vat_percent),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                violations.push(ConfigViolation {
                    field,
                    message: "must not be negative".to_string(),
                });
            }
        }
        if self.risk_percent < Decimal::ZERO {
            violations.push(ConfigViolation {
                field: "risk_percent",
                message: "must not be negative".to_string(),
            });
        }

        if self.currency_rates.is_empty() {
            violations.push(ConfigViolation {
                field: "currency_rates",
                message: "rate table is empty".to_string(),
            });
            return violations;
        }
        for required in [BASE_CURRENCY, self.currency] {
            if !self.currency_rates.contains_key(&required) {
                violations.push(ConfigViolation {
                    field: "currency_rates",
                    message: format!("missing rate for {required}"),
                });
            }
        }
        for (currency, rate) in &self.currency_rates {
            if *rate <= Decimal::ZERO {
                violations.push(ConfigViolation {
                    field: "currency_rates",
                    message: format!("rate for {currency} must be positive"),
                });
            }
        }
        if let Some(base) = self.currency_rates.get(&BASE_CURRENCY) {
            if *base != Decimal::ONE {
                violations.push(ConfigViolation {
                    field: "currency_rates",
                    message: format!("base currency {BASE_CURRENCY} must have rate 1.0"),
                });
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CalculatorConfig::default().validate().is_empty());
    }

    #[test]
    fn test_load_fills_missing_fields_from_defaults() {
        let config = CalculatorConfig::load(r#"{"hourly_rate": "12.5", "vat_percent": "8"}"#)
            .unwrap();
        assert_eq!(config.hourly_rate, "12.5".parse().unwrap());
        assert_eq!(config.vat_percent, Decimal::from(8));
        // Untouched fields come from defaults
        assert_eq!(config.printer_power_w, Decimal::from(130));
        assert_eq!(config.currency, Currency::Pln);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        assert!(CalculatorConfig::load("{not json").is_err());
    }

    #[test]
    fn test_negative_rate_is_a_violation() {
        let config = CalculatorConfig {
            hourly_rate: Decimal::from(-1),
            ..Default::default()
        };
        let violations = config.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "hourly_rate");
    }

    #[test]
    fn test_percentages_over_100_are_allowed() {
        let config = CalculatorConfig {
            margin_percent: Decimal::from(250),
            vat_percent: Decimal::from(120),
            ..Default::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_missing_display_currency_rate() {
        let mut config = CalculatorConfig {
            currency: Currency::Gbp,
            ..Default::default()
        };
        config.currency_rates.remove(&Currency::Gbp);
        let violations = config.validate();
        assert!(violations
            .iter()
            .any(|v| v.message.contains("missing rate for GBP")));
    }

    #[test]
    fn test_base_rate_must_be_one() {
        let mut config = CalculatorConfig::default();
        config
            .currency_rates
            .insert(Currency::Pln, Decimal::new(95, 2));
        let violations = config.validate();
        assert!(violations.iter().any(|v| v.message.contains("rate 1.0")));
    }

    #[test]
    fn test_empty_rate_table() {
        let config = CalculatorConfig {
            currency_rates: RateTable::new(),
            ..Default::default()
        };
        assert!(!config.validate().is_empty());
    }
}
