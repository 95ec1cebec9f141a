//! Bottle API Module
//!
//! | Path | Method | Access |
//! |------|--------|--------|
//! | /api/bottles | GET | authenticated |
//! | /api/bottles | POST | admin |
//! | /api/bottles/{id} | GET | authenticated |
//! | /api/bottles/add-bottles-to-order | POST | staff |
//! | /api/bottles/return-bottles | POST | staff |

mod handler;

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::auth::{require_admin, require_staff};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/bottles", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let staff_routes = Router::new()
        .route("/add-bottles-to-order", post(handler::add_to_order))
        .route("/return-bottles", post(handler::return_bottles))
        .layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(staff_routes).merge(admin_routes)
}
