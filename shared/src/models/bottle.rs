//! Bottle Model

use super::OrderStatus;
use serde::{Deserialize, Serialize};

/// Physical bottle status
///
/// `Discarded` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BottleStatus {
    #[default]
    Available,
    Sold,
    Discarded,
}

impl BottleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleStatus::Available => "available",
            BottleStatus::Sold => "sold",
            BottleStatus::Discarded => "discarded",
        }
    }
}

/// Bottle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Bottle {
    pub id: i64,
    pub status: BottleStatus,
    /// Number of completed returns
    pub reuse_count: i64,
    /// Base64 PNG of the QR code, generated on first request
    pub qr_code: Option<String>,
    pub created_at: i64,
}

/// Link between a bottle and the order it went out with
///
/// A link is open while `returned_on` is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BottleOrder {
    pub id: i64,
    pub bottle_id: i64,
    pub order_id: i64,
    /// Return date (YYYY-MM-DD)
    pub returned_on: Option<String>,
}

impl BottleOrder {
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }
}

/// Create bottles payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BottleCreate {
    pub count: Option<u32>,
}

/// Attach bottles to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachBottlesRequest {
    pub order_id: i64,
    pub bottle_ids: Vec<i64>,
}

/// Outcome of an attach batch
///
/// A rejected bottle stops the batch but is not an error: earlier bottles
/// stay assigned and `rejected` names the bottle that stopped it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachOutcome {
    pub message: String,
    pub order_id: i64,
    pub attached: Vec<i64>,
    pub rejected: Option<RejectedBottle>,
    pub bottle_count: i64,
    pub order_status: OrderStatus,
}

/// Bottle that stopped an attach batch, with the error code and reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedBottle {
    pub bottle_id: i64,
    pub code: u16,
    pub reason: String,
}

/// Return bottles payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnBottlesRequest {
    pub bottle_ids: Vec<i64>,
}

/// Bottle totals per status
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BottleStatusCounts {
    pub total: i64,
    pub available: i64,
    pub sold: i64,
    pub discarded: i64,
}
