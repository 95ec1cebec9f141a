//! Address API Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared::models::{Address, AddressCreate, AddressUpdate};

use crate::accounts;
use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, user: CurrentUser) -> ServiceResult<Json<Vec<Address>>> {
    Ok(Json(accounts::list_addresses(&state.pool, &user).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AddressCreate>,
) -> ServiceResult<(StatusCode, Json<Address>)> {
    let address = accounts::create_address(&state.pool, &user, &req).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Address>> {
    Ok(Json(accounts::get_address(&state.pool, &user, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<AddressUpdate>,
) -> ServiceResult<Json<Address>> {
    Ok(Json(accounts::update_address(&state.pool, &user, id, &req).await?))
}
