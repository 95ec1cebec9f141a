//! Shared types for the aqua delivery backend
//!
//! Domain models, request/response DTOs and the unified error system
//! used by the server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use serde::{Deserialize, Serialize};
