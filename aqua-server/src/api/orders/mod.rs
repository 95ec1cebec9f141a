//! Order API Module

mod handler;

use axum::routing::{get, patch};
use axum::{Router, middleware};

use crate::auth::require_staff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/customer/{id}", get(handler::list_for_customer))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/change-status", patch(handler::change_status))
        .layer(middleware::from_fn(require_staff));

    read_routes.merge(manage_routes)
}
