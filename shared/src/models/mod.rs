//! Data models
//!
//! Shared between aqua-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are millis.

pub mod address;
pub mod bottle;
pub mod order;
pub mod payment;
pub mod stats;
pub mod user;

// Re-exports
pub use address::*;
pub use bottle::*;
pub use order::*;
pub use payment::*;
pub use stats::*;
pub use user::*;
