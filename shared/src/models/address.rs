//! Address Model

use serde::{Deserialize, Serialize};

/// Delivery address, owned by exactly one customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub title: String,
    pub user_id: i64,
}

/// Create address payload
///
/// `user_id` defaults to the caller when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCreate {
    pub title: String,
    pub user_id: Option<i64>,
}

/// Update address payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub title: Option<String>,
    pub user_id: Option<i64>,
}
