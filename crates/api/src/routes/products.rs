//! Product route handlers.
//!
//! Reads are public; writes require the admin role. The wishlist toggle is
//! the one mutation any authenticated user may perform.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use clementine_core::{CategoryId, Discount, Price, ProductId, Quantity};

use crate::db::{ProductRepository, RepositoryError, WishlistChange, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::{AppJson, CurrentUser};
use crate::models::NewProduct;
use crate::state::AppState;

/// Create/update payload.
///
/// `categories` is the complete category set: an update replaces the
/// stored links with exactly this list.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub discount: Discount,
    pub quantity: Quantity,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

impl ProductPayload {
    fn into_new_product(self) -> Result<NewProduct> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }

        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            discount: self.discount,
            quantity: self.quantity,
            categories: self.categories,
        })
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// `GET /api/products` - List products, optionally filtered by a
/// case-insensitive name substring.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>> {
    let products = ProductRepository::new(state.pool())
        .search(query.search.as_deref())
        .await?;

    Ok(Json(json!({ "products": products })))
}

/// `GET /api/products/{id}` - Get a product with its categories and
/// wishlist count.
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(json!({ "product": product })))
}

/// `POST /api/products` - Add a product (admin only).
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    AppJson(input): AppJson<ProductPayload>,
) -> Result<(StatusCode, Json<Value>)> {
    claims.require_admin()?;

    let new_product = input.into_new_product()?;
    ProductRepository::new(state.pool())
        .create(&new_product)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "A new product successfully added" })),
    ))
}

/// `PATCH /api/products/{id}` - Replace a product's fields and category
/// links (admin only).
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(product_id): Path<ProductId>,
    AppJson(input): AppJson<ProductPayload>,
) -> Result<Json<Value>> {
    claims.require_admin()?;

    let new_product = input.into_new_product()?;
    ProductRepository::new(state.pool())
        .update(product_id, &new_product)
        .await?;

    Ok(Json(json!({ "message": "Product successfully updated" })))
}

/// `DELETE /api/products/{id}` - Delete a product (admin only).
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Value>> {
    claims.require_admin()?;

    ProductRepository::new(state.pool()).delete(product_id).await?;

    Ok(Json(json!({ "message": "Product successfully deleted" })))
}

/// `POST /api/products/{id}/wishlist` - Toggle the caller's wishlist
/// membership for a product (any authenticated user).
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Value>> {
    let change = WishlistRepository::new(state.pool())
        .toggle(claims.sub, product_id)
        .await?;

    let message = match change {
        WishlistChange::Added => "Product successfully added to wishlist",
        WishlistChange::Removed => "Product successfully removed from wishlist",
    };

    Ok(Json(json!({ "message": message })))
}
