//! JWT Extractor
//!
//! `CurrentUser` as a handler argument: reuses the principal injected by
//! [`require_auth`](super::require_auth), or validates the bearer token itself.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::CurrentUser;
use crate::state::AppState;

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);
        let path = parts.uri.path().to_owned();

        let user = super::middleware::authenticate(state, auth_header.as_deref(), &path).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

