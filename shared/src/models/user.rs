//! User Model

use super::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
///
/// Every role other than `Customer` is staff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
    Driver,
    CustomerService,
}

impl UserRole {
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Customer)
    }

    pub fn is_customer(&self) -> bool {
        matches!(self, UserRole::Customer)
    }

    /// Human readable name, shown as `service_type` in user listings
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Customer => "Customer",
            UserRole::Driver => "Driver",
            UserRole::CustomerService => "Customer Service",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// User entity (database row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    /// Per-customer bottle price overriding the default unit price
    pub special_bottle_price: Option<f64>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// User as returned by the API, enriched with ledger and order data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub service_type: String,
    pub special_bottle_price: Option<f64>,
    pub wallet_balance: f64,
    /// Date of the most recent order (millis), customers only
    pub last_order_date: Option<i64>,
    pub addresses: Vec<Address>,
    pub created_at: i64,
}

/// Nested address payload accepted when creating a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAddress {
    pub title: String,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub special_bottle_price: Option<f64>,
    pub password: Option<String>,
    #[serde(default)]
    pub addresses: Vec<NewAddress>,
}

/// Update user payload
///
/// `role` and `special_bottle_price` are only honored for administrators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<UserRole>,
    pub special_bottle_price: Option<f64>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: token plus profile summary and wallet balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub token: String,
    pub wallet: f64,
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
