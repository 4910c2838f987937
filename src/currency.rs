//! Currency conversion over a per-currency exchange rate table
//!
//! Rates are quoted as units of the listed currency per one unit of the
//! base currency (PLN). Conversion goes through the base:
//! `amount / rates[from] * rates[to]`. Rounding happens only at the
//! display boundary, never between calculation stages.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, AppResult};
use crate::types::Currency;

/// Exchange rates relative to the base currency
pub type RateTable = HashMap<Currency, Decimal>;

fn rate(rates: &RateTable, currency: Currency) -> AppResult<Decimal> {
    let rate = *rates
        .get(&currency)
        .ok_or(AppError::UnknownCurrency(currency))?;
    if rate <= Decimal::ZERO {
        return Err(AppError::invalid_input(
            "currency_rates",
            format!("rate for {currency} must be positive"),
        ));
    }
    Ok(rate)
}

/// Convert an amount between currencies
///
/// Same-currency conversion returns the amount untouched and never fails,
/// even when that currency is absent from the table.
pub fn convert(
    amount: Decimal,
    from: Currency,
    to: Currency,
    rates: &RateTable,
) -> AppResult<Decimal> {
    if from == to {
        return Ok(amount);
    }
    Ok(amount / rate(rates, from)? * rate(rates, to)?)
}

/// Round a monetary amount to two decimals, half away from zero
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount with the currency symbol in its conventional position
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    let rounded = round_display(amount);
    if currency.symbol_leading() {
        format!("{}{:.2}", currency.symbol(), rounded)
    } else {
        format!("{:.2} {}", rounded, currency.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rates;

    #[test]
    fn test_convert_through_base() {
        let rates = default_rates();
        // 100 PLN -> EUR at 0.23 EUR per PLN
        let eur = convert(Decimal::from(100), Currency::Pln, Currency::Eur, &rates).unwrap();
        assert_eq!(eur, Decimal::from(23));
        // EUR -> USD goes through PLN
        let usd = convert(Decimal::from(23), Currency::Eur, Currency::Usd, &rates).unwrap();
        assert_eq!(usd, Decimal::from(25));
    }

    #[test]
    fn test_same_currency_skips_rate_lookup() {
        let empty = RateTable::new();
        let amount = "19.99".parse().unwrap();
        assert_eq!(
            convert(amount, Currency::Gbp, Currency::Gbp, &empty).unwrap(),
            amount
        );
    }

    #[test]
    fn test_missing_rate_is_an_error() {
        let mut rates = RateTable::new();
        rates.insert(Currency::Pln, Decimal::ONE);
        let err = convert(Decimal::ONE, Currency::Pln, Currency::Eur, &rates).unwrap_err();
        assert_eq!(err, AppError::UnknownCurrency(Currency::Eur));
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        let mut rates = RateTable::new();
        rates.insert(Currency::Pln, Decimal::ONE);
        rates.insert(Currency::Eur, Decimal::ZERO);
        assert!(convert(Decimal::ONE, Currency::Eur, Currency::Pln, &rates).is_err());
    }

    #[test]
    fn test_round_display_half_up() {
        assert_eq!(round_display("2.345".parse().unwrap()), "2.35".parse().unwrap());
        assert_eq!(round_display("2.344".parse().unwrap()), "2.34".parse().unwrap());
        assert_eq!(round_display("24.15474".parse().unwrap()), "24.15".parse().unwrap());
    }

    #[test]
    fn test_format_amount_symbol_position() {
        let amount = "24.155".parse().unwrap();
        assert_eq!(format_amount(amount, Currency::Pln), "24.16 zł");
        assert_eq!(format_amount(amount, Currency::Usd), "$24.16");
    }
}
