//! Order Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// Accepts the status name or its single-letter code, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "p" => Ok(OrderStatus::Pending),
            "approved" | "a" => Ok(OrderStatus::Approved),
            "delivered" | "d" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" | "c" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("{s} is not a valid order status")),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Staff member handling the order
    pub receiver_id: Option<i64>,
    pub address_id: i64,
    pub quantity: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    /// Requested delivery date (YYYY-MM-DD)
    pub delivery_date: Option<String>,
    /// Creation time (millis)
    pub order_date: i64,
    /// Fixed at creation
    pub total_price: f64,
}

/// Create order payload
///
/// `customer_id` defaults to the caller when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub address_id: i64,
    pub quantity: i64,
    pub notes: Option<String>,
    pub delivery_date: Option<String>,
}

/// Order detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub address_title: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    /// Bottles ever attached to this order
    pub bottles: Vec<i64>,
}

/// Change status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub order_id: i64,
    pub status: String,
}
