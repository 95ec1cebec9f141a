//! Dashboard statistics (staff)

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router, middleware};
use shared::models::DashboardStats;

use crate::auth::require_staff;
use crate::db::stats;
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/stats", get(get_stats))
        .layer(middleware::from_fn(require_staff))
}

pub async fn get_stats(State(state): State<AppState>) -> ServiceResult<Json<DashboardStats>> {
    Ok(Json(stats::dashboard(&state.pool).await?))
}
