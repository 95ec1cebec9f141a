//! Payment API Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use shared::models::{Payment, PaymentCreate};

use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::ledger;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, user: CurrentUser) -> ServiceResult<Json<Vec<Payment>>> {
    Ok(Json(ledger::list_payments(&state.pool, &user).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PaymentCreate>,
) -> ServiceResult<(StatusCode, Json<Payment>)> {
    let payment = ledger::post_payment(&state.pool, &user, &req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}
