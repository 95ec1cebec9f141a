//! Aqua Server - bottled-water delivery backend
//!
//! Customers order water, staff hand out bottles against orders and take
//! them back, and every delivery and payment lands in a per-customer ledger.
//!
//! # Module layout
//!
//! ```text
//! aqua-server/src/
//! ├── api/          # HTTP routes and handlers
//! ├── auth/         # JWT, CurrentUser, middleware
//! ├── db/           # SQLite pool, migrations, repositories
//! ├── accounts.rs   # login, users, addresses
//! ├── inventory.rs  # bottle lifecycle and QR codes
//! ├── fulfillment.rs # orders, attaching and returning bottles
//! ├── ledger.rs     # charges, payments, wallet balance
//! ├── pricing.rs    # unit prices and reuse limit
//! └── qr.rs         # QR rendering
//! ```

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod fulfillment;
pub mod inventory;
pub mod ledger;
pub mod logger;
pub mod money;
pub mod pricing;
pub mod qr;
pub mod state;
pub mod util;

pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use logger::{cleanup_old_logs, init_logger_with_file};
pub use state::AppState;
