//! Address API Module

mod handler;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/address", routes())
}

fn routes() -> Router<AppState> {
    // Ownership is checked per request: customers see their own, staff all
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
}
