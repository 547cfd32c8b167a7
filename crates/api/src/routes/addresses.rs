//! Address route handlers.
//!
//! Addresses are only ever reachable through their owner: every handler
//! checks the claim against the user ID in the path before touching the
//! repository, and the repository scopes every query by that user ID.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use clementine_core::{AddressId, UserId};

use crate::db::{AddressRepository, RepositoryError};
use crate::error::Result;
use crate::middleware::{AppJson, CurrentUser};
use crate::models::NewAddress;
use crate::state::AppState;

/// `POST /api/users/{id}/addresses` - Add an address (self only).
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
    AppJson(input): AppJson<NewAddress>,
) -> Result<(StatusCode, Json<Value>)> {
    claims.require_self(user_id)?;

    AddressRepository::new(state.pool())
        .create(user_id, &input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "A new address successfully added" })),
    ))
}

/// `GET /api/users/{id}/addresses` - List the user's addresses (self only).
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(json!({ "addresses": addresses })))
}

/// `GET /api/users/{id}/addresses/{address_id}` - Get one address (self
/// only).
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path((user_id, address_id)): Path<(UserId, AddressId)>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    let address = AddressRepository::new(state.pool())
        .get(user_id, address_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(json!({ "address": address })))
}

/// `PATCH /api/users/{id}/addresses/{address_id}` - Replace an address
/// (self only).
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path((user_id, address_id)): Path<(UserId, AddressId)>,
    AppJson(input): AppJson<NewAddress>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    AddressRepository::new(state.pool())
        .update(user_id, address_id, &input)
        .await?;

    Ok(Json(json!({ "message": "Address successfully updated" })))
}

/// `DELETE /api/users/{id}/addresses/{address_id}` - Delete an address
/// (self only).
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path((user_id, address_id)): Path<(UserId, AddressId)>,
) -> Result<Json<Value>> {
    claims.require_self(user_id)?;

    AddressRepository::new(state.pool())
        .delete(user_id, address_id)
        .await?;

    Ok(Json(json!({ "message": "Address successfully deleted" })))
}
