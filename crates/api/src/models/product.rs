//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{CategoryId, Discount, Price, ProductId, Quantity};

use super::Category;

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit.
    pub price: Price,
    /// Discount percentage (0-100).
    pub discount: Discount,
    /// Units in stock.
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product together with its relationship projections.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    /// The categories this product belongs to.
    pub categories: Vec<Category>,
    /// How many users currently have this product wishlisted.
    pub wishlist_count: i64,
}

/// Input for creating or replacing a product.
///
/// `categories` is the complete category set for the product; an update
/// replaces the existing links with exactly this set.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub discount: Discount,
    pub quantity: Quantity,
    pub categories: Vec<CategoryId>,
}
