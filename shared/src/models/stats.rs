//! Dashboard statistics

use super::BottleStatusCounts;
use serde::{Deserialize, Serialize};

/// Customer ranked by number of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopCustomer {
    pub customer_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub order_count: i64,
}

/// Aggregated statistics for the staff dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: i64,
    /// Bottles attached per order, rounded up
    pub avg_bottles_per_order: i64,
    pub total_payments: i64,
    pub avg_payment_per_day: f64,
    pub avg_payment_per_month: f64,
    pub bottles: BottleStatusCounts,
    pub top_customers: Vec<TopCustomer>,
}
