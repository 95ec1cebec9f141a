//! Pricing and reuse policy
//!
//! Order totals and delivery charges use different fallbacks on purpose:
//! the total ignores a zero special price, the charge does not.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};

use crate::money::{line_total, to_decimal};

fn out_of_range() -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, "Order amount is out of range")
}

#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    /// Unit price for order totals when the customer has no positive special price
    pub default_unit_price: Decimal,
    /// Unit price for delivery charges when the customer has no special price
    pub delivery_fallback_price: Decimal,
    /// Returns after which a bottle is discarded
    pub reuse_limit: i64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            default_unit_price: Decimal::from(20),
            delivery_fallback_price: Decimal::from(20),
            reuse_limit: 35,
        }
    }
}

impl PricingPolicy {
    /// Frozen order total: `quantity × (special price if > 0 else default)`
    pub fn order_total(&self, quantity: i64, special_price: Option<f64>) -> AppResult<f64> {
        let unit = match special_price {
            Some(price) if price > 0.0 => to_decimal(price),
            _ => self.default_unit_price,
        };
        line_total(quantity, unit).ok_or_else(out_of_range)
    }

    /// Ledger amount posted on delivery (negative)
    pub fn delivery_charge(&self, quantity: i64, special_price: Option<f64>) -> AppResult<f64> {
        let unit = special_price
            .map(to_decimal)
            .unwrap_or(self.delivery_fallback_price);
        line_total(quantity, unit).map(|total| -total).ok_or_else(out_of_range)
    }

    /// Whether a bottle with this many returns is retired
    pub fn is_worn_out(&self, reuse_count: i64) -> bool {
        reuse_count >= self.reuse_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total_uses_default_price() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.order_total(3, None).unwrap(), 60.0);
        assert_eq!(policy.order_total(3, Some(0.0)).unwrap(), 60.0);
    }

    #[test]
    fn test_order_total_uses_special_price() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.order_total(4, Some(15.0)).unwrap(), 60.0);
    }

    #[test]
    fn test_delivery_charge_is_negative() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.delivery_charge(3, None).unwrap(), -60.0);
        assert_eq!(policy.delivery_charge(4, Some(15.0)).unwrap(), -60.0);
    }

    #[test]
    fn test_delivery_charge_keeps_zero_special_price() {
        let policy = PricingPolicy::default();
        // Zero special price means free delivery, unlike the order total
        assert_eq!(policy.delivery_charge(5, Some(0.0)).unwrap(), 0.0);
        assert_eq!(policy.order_total(5, Some(0.0)).unwrap(), 100.0);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let policy = PricingPolicy::default();
        let err = policy.order_total(i64::MAX, Some(1e12)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(policy.delivery_charge(i64::MAX, Some(1e12)).is_err());
    }

    #[test]
    fn test_worn_out_threshold() {
        let policy = PricingPolicy::default();
        assert!(!policy.is_worn_out(34));
        assert!(policy.is_worn_out(35));
        assert!(policy.is_worn_out(36));
    }
}
