//! Category route handlers.
//!
//! Categories are addressed by slug, not ID: the slug is the stable lookup
//! key and is recomputed from the name on every create and rename.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{AppJson, CurrentUser};
use crate::models::NewCategory;
use crate::state::AppState;

/// Create/rename payload. There is no slug field; the slug is derived.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryPayload {
    fn into_new_category(self) -> Result<NewCategory> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }

        Ok(NewCategory {
            name: self.name,
            description: self.description,
        })
    }
}

/// `GET /api/categories` - List every category.
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(Json(json!({ "categories": categories })))
}

/// `GET /api/categories/{slug}` - Get a category and its products.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let (category, products) = CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(json!({ "category": category, "products": products })))
}

/// `POST /api/categories` - Add a category (admin only).
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    AppJson(input): AppJson<CategoryPayload>,
) -> Result<(StatusCode, Json<Value>)> {
    claims.require_admin()?;

    let new_category = input.into_new_category()?;
    CategoryRepository::new(state.pool())
        .create(&new_category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "A new category successfully added" })),
    ))
}

/// `PATCH /api/categories/{slug}` - Rename a category (admin only).
///
/// On success the category's slug is re-derived from the new name, so the
/// resource may move to a new URL.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
    AppJson(input): AppJson<CategoryPayload>,
) -> Result<Json<Value>> {
    claims.require_admin()?;

    let new_category = input.into_new_category()?;
    CategoryRepository::new(state.pool())
        .update(&slug, &new_category)
        .await?;

    Ok(Json(json!({ "message": "Category successfully updated" })))
}

/// `DELETE /api/categories/{slug}` - Delete a category (admin only).
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    claims.require_admin()?;

    CategoryRepository::new(state.pool()).delete(&slug).await?;

    Ok(Json(json!({ "message": "Category successfully deleted" })))
}
