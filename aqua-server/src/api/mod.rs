//! HTTP API
//!
//! | prefix | module |
//! |--------|--------|
//! | `/health` | [`health`] |
//! | `/api/users`, `/api/customers`, `/api/employees` | [`users`] |
//! | `/api/address` | [`addresses`] |
//! | `/api/payments` | [`payments`] |
//! | `/api/orders` | [`orders`] |
//! | `/api/bottles` | [`bottles`] |
//! | `/api/dashboard` | [`dashboard`] |

pub mod addresses;
pub mod bottles;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod payments;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

/// All routes, without global middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(addresses::router())
        .merge(payments::router())
        .merge(orders::router())
        .merge(bottles::router())
        .merge(dashboard::router())
}

/// The application as served: routes, middleware and state
pub fn build_app(state: AppState) -> Router {
    build_router()
        // JWT authentication, injects CurrentUser before any handler runs
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
