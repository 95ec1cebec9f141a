//! Order API Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared::models::{ChangeStatusRequest, Order, OrderCreate, OrderDetail};

use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::fulfillment;
use crate::state::AppState;

/// Staff: every order by status priority. Customers: their own, newest first.
pub async fn list(State(state): State<AppState>, user: CurrentUser) -> ServiceResult<Json<Vec<Order>>> {
    Ok(Json(fulfillment::list_orders(&state.pool, &user).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<OrderCreate>,
) -> ServiceResult<(StatusCode, Json<Order>)> {
    let order = fulfillment::create_order(&state.pool, &state.pricing, &user, &req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_for_customer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(customer_id): Path<i64>,
) -> ServiceResult<Json<Vec<Order>>> {
    Ok(Json(
        fulfillment::list_for_customer(&state.pool, &user, customer_id).await?,
    ))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ServiceResult<Json<OrderDetail>> {
    Ok(Json(fulfillment::get_order(&state.pool, &user, id).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangeStatusRequest>,
) -> ServiceResult<Json<Order>> {
    let order = fulfillment::change_status(&state.pool, &state.pricing, &user, &req).await?;
    Ok(Json(order))
}
