//! Payment (ledger) API Module
//!
//! Anyone authenticated may read (customers only their own entries);
//! recording a payment is staff-only. There is no update or delete.

mod handler;

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::auth::require_staff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new().route("/", get(handler::list));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_staff));

    read_routes.merge(manage_routes)
}
