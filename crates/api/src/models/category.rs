//! Category domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{CategoryId, Slug};

/// A catalog category.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Unique display name.
    pub name: String,
    pub description: String,
    /// URL-safe lookup key, always derived from the current name.
    pub slug: Slug,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or renaming a category.
///
/// There is no slug field: the slug is recomputed from the name on every
/// create and rename.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}
