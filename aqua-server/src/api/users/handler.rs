//! User API Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Value, json};
use shared::models::{ChangePasswordRequest, LoginRequest, LoginResponse, UserCreate, UserResponse, UserUpdate};

use crate::accounts;
use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    let resp = accounts::login(&state.pool, &state.jwt, &req).await?;
    Ok(Json(resp))
}

pub async fn list(State(state): State<AppState>, user: CurrentUser) -> ServiceResult<Json<Vec<UserResponse>>> {
    Ok(Json(accounts::list_users(&state.pool, &user).await?))
}

pub async fn list_customers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ServiceResult<Json<Vec<UserResponse>>> {
    Ok(Json(accounts::list_customers(&state.pool, &user).await?))
}

pub async fn list_employees(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ServiceResult<Json<Vec<UserResponse>>> {
    Ok(Json(accounts::list_employees(&state.pool, &user).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UserCreate>,
) -> ServiceResult<(StatusCode, Json<UserResponse>)> {
    let created = accounts::create_user(&state.pool, &user, &req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ServiceResult<Json<UserResponse>> {
    Ok(Json(accounts::get_user(&state.pool, &user, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UserUpdate>,
) -> ServiceResult<Json<UserResponse>> {
    Ok(Json(accounts::update_user(&state.pool, &user, id, &req).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ServiceResult<Json<Value>> {
    accounts::change_password(&state.pool, &user, &req).await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}
