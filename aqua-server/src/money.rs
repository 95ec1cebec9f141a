//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64` and computed as `Decimal`, rounded to two
//! decimal places on the way back.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Largest single ledger entry accepted from an operator
pub const MAX_AMOUNT: f64 = 1_000_000.0;
/// Largest unit price, special or configured
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Largest bottle count on a single order
pub const MAX_QUANTITY: i64 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{field_name} must be a finite number, got {value}"));
    }
    Ok(())
}

/// Sum ledger amounts without floating point drift
pub fn sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

/// Validate a unit price: finite and within `0..=MAX_PRICE`
pub fn require_price(value: f64, field_name: &str) -> Result<(), String> {
    require_finite(value, field_name)?;
    if !(0.0..=MAX_PRICE).contains(&value) {
        return Err(format!("{field_name} must be between 0 and {MAX_PRICE}, got {value}"));
    }
    Ok(())
}

/// `quantity × unit_price`, rounded; `None` on overflow
pub fn line_total(quantity: i64, unit_price: Decimal) -> Option<f64> {
    Decimal::from(quantity).checked_mul(unit_price).map(to_f64)
}
