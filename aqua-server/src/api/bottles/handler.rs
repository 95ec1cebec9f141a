//! Bottle API Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Value, json};
use shared::models::{AttachBottlesRequest, AttachOutcome, Bottle, BottleCreate, ReturnBottlesRequest};

use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::{fulfillment, inventory};

/// All bottles, QR codes generated on first read
pub async fn list(State(state): State<AppState>) -> ServiceResult<Json<Vec<Bottle>>> {
    Ok(Json(inventory::list(&state.pool, state.qr.as_ref()).await?))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ServiceResult<Json<Bottle>> {
    Ok(Json(inventory::get(&state.pool, state.qr.as_ref(), id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<BottleCreate>,
) -> ServiceResult<(StatusCode, Json<Vec<Bottle>>)> {
    let created = inventory::create_bottles(&state.pool, req.count.unwrap_or(1)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 200 when every bottle was attached, 409 with the same body when one was refused
pub async fn add_to_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AttachBottlesRequest>,
) -> ServiceResult<(StatusCode, Json<AttachOutcome>)> {
    let outcome = fulfillment::attach_bottles(&state.pool, &state.pricing, &user, &req).await?;
    let status = if outcome.rejected.is_some() {
        StatusCode::CONFLICT
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

pub async fn return_bottles(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ReturnBottlesRequest>,
) -> ServiceResult<Json<Value>> {
    let returned = fulfillment::return_bottles(&state.pool, &state.pricing, &user, &req).await?;
    Ok(Json(json!({
        "message": "Bottles returned successfully",
        "bottles": returned,
    })))
}
