//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role guards.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, AppResult};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::db::users;
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;

/// Routes reachable without a token
fn is_public_api_route(path: &str) -> bool {
    path == "/api/users/login"
}

/// Validate an `Authorization` header value and load the principal
///
/// The role comes from the current user row, not the token, so a demoted
/// or deleted account loses access on its next request.
pub(crate) async fn authenticate(
    state: &AppState,
    auth_header: Option<&str>,
    path: &str,
) -> AppResult<CurrentUser> {
    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %path);
            return Err(AppError::unauthorized());
        }
    };

    let claimed = match state.jwt.validate_token(token) {
        Ok(claims) => CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?,
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %path);
            return match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    let user = users::find_by_id(&state.pool, claimed.id)
        .await
        .map_err(|e| AppError::from(ServiceError::from(e)))?;
    match user {
        Some(user) => {
            if user.role != claimed.role {
                tracing::debug!(user_id = user.id, "Token role is stale, using current role");
            }
            Ok(CurrentUser::from(&user))
        }
        None => {
            security_log!(WARN, "auth_unknown_user", user_id = claimed.id, uri = %path);
            Err(AppError::invalid_token("User no longer exists"))
        }
    }
}

/// Authentication middleware - requires a valid bearer token
///
/// Validates `Authorization: Bearer <token>` and injects [`CurrentUser`]
/// into the request extensions.
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - paths outside `/api/` (health check, 404s)
/// - `/api/users/login`
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_owned();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || is_public_api_route(&path)
    {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let user = authenticate(&state, auth_header.as_deref(), &path).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Staff middleware - any non-customer role
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    user.ensure_staff()?;
    Ok(next.run(req).await)
}

/// Admin middleware
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    user.ensure_admin()?;
    Ok(next.run(req).await)
}
