//! Payment Model

use serde::{Deserialize, Serialize};

/// Ledger entry
///
/// Negative amounts are charges, positive amounts are payments received.
/// Entries are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub amount: f64,
    pub customer_id: i64,
    /// Staff member who recorded the entry; unset for system charges
    pub receiver_id: Option<i64>,
    pub created_at: i64,
}

/// Record a payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub customer_id: i64,
    pub amount: f64,
}
