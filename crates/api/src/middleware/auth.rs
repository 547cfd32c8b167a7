//! Authentication extractor.
//!
//! Handlers that need an identity take [`CurrentUser`] as an argument; the
//! extractor verifies the bearer token and hands the handler a typed
//! [`Claims`]. Authorization decisions (self/admin) are then explicit method
//! calls on the claim, made before any storage access.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::services::token::Claims;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(claims): CurrentUser,
///     Path(user_id): Path<UserId>,
/// ) -> Result<Json<Value>> {
///     claims.require_self(user_id)?;
///     // ...
/// }
/// ```
pub struct CurrentUser(pub Claims);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(Self(claims))
    }
}

/// Pull the token out of the `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization header not found".to_owned()))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must be a bearer token".to_owned()))
}
