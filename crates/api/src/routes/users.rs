//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use clementine_core::{Email, UserId, Username};

use crate::db::{RepositoryError, UserRepository, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::{AppJson, CurrentUser};
use crate::models::UserUpdate;
use crate::services::auth::{AuthService, SignupInput};
use crate::state::AppState;

/// Sign-up payload.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Sign-in payload.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Profile update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
}

/// Password change payload.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// `POST /api/users/signup` - Register an account, returning its first
/// session token.
pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let auth = AuthService::new(state.pool(), state.tokens());

    let token = auth
        .sign_up(SignupInput {
            username: &input.username,
            email: &input.email,
            password: &input.password,
            is_admin: input.is_admin,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "access_token": token }))))
}

/// `POST /api/users/signin` - Exchange credentials for a session token.
pub async fn sign_in(
    State(state): State<AppState>,
    AppJson(input): AppJson<SigninRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool(), state.tokens());

    let token = auth.sign_in(&input.email, &input.password).await?;

    Ok(Json(json!({ "access_token": token })))
}

/// `GET /api/users` - List every account (admin only).
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    claims.require_admin()?;

    let users = UserRepository::new(state.pool()).list().await?;

    Ok(Json(json!({ "users": users })))
}

/// `GET /api/users/{id}` - Get one account (self only).
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    let user = UserRepository::new(state.pool())
        .get(user_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(json!({ "user": user })))
}

/// `GET /api/users/{id}/wishlist` - The user's wishlisted products (self
/// only).
pub async fn wishlist(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    let products = WishlistRepository::new(state.pool())
        .products_for_user(user_id)
        .await?;

    Ok(Json(json!({ "wishlist": products })))
}

/// `PATCH /api/users/{id}` - Update profile fields (self only).
///
/// The ID is immutable and the password has its own endpoint, so neither
/// can be changed here no matter what the payload contains.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    let update = UserUpdate {
        username: Username::parse(&input.username)
            .map_err(|e| AppError::Validation(e.to_string()))?,
        email: Email::parse(&input.email).map_err(|e| AppError::Validation(e.to_string()))?,
    };

    UserRepository::new(state.pool())
        .update_profile(user_id, &update)
        .await?;

    Ok(Json(json!({ "message": "User successfully updated" })))
}

/// `PATCH /api/users/{id}/password` - Change the password (self only).
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
    AppJson(input): AppJson<UpdatePasswordRequest>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    AuthService::new(state.pool(), state.tokens())
        .change_password(user_id, &input.password)
        .await?;

    Ok(Json(json!({ "message": "Password successfully updated" })))
}

/// `DELETE /api/users/{id}` - Delete the account and everything it owns
/// (self only).
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    UserRepository::new(state.pool()).delete(user_id).await?;

    Ok(Json(json!({ "message": "User successfully deleted" })))
}
