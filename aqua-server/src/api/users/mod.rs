//! User API Module
//!
//! Login is public; listing and registration are staff-only; a profile is
//! readable and writable by its owner or an admin.

mod handler;

use axum::routing::{get, post, put};
use axum::{Router, middleware};

use crate::auth::require_staff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let account_routes = Router::new()
        .route("/api/users/login", post(handler::login))
        .route("/api/users/change-password", put(handler::change_password))
        .route("/api/users/{id}", get(handler::get_by_id).put(handler::update));

    let staff_routes = Router::new()
        .route("/api/users", get(handler::list).post(handler::create))
        .route("/api/customers", get(handler::list_customers))
        .route("/api/employees", get(handler::list_employees))
        .layer(middleware::from_fn(require_staff));

    account_routes.merge(staff_routes)
}
