//! Category repository.
//!
//! The slug column is always the deterministic derivation of the current
//! name: it is recomputed here on create and on rename. Collisions (two
//! names deriving the same slug) are rejected by the unique constraint, not
//! pre-checked.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clementine_core::{CategoryId, Slug};

use super::RepositoryError;
use crate::models::{Category, NewCategory, Product};

const DUPLICATE_CATEGORY: &str = "category name or slug already exists";

#[derive(sqlx::FromRow)]
pub(crate) struct CategoryRow {
    id: CategoryId,
    name: String,
    description: String,
    slug: Slug,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    pub(crate) fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            description: self.description,
            slug: self.slug,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for category rows.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new category, deriving its slug from the name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or derived slug
    /// already exists, `RepositoryError::Database` for other failures.
    pub async fn create(&self, category: &NewCategory) -> Result<Category, RepositoryError> {
        let slug = Slug::from_name(&category.name);

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO categories (id, name, description, slug)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, slug, created_at, updated_at
            ",
        )
        .bind(CategoryId::generate())
        .bind(&category.name)
        .bind(&category.description)
        .bind(&slug)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique_violation(e, DUPLICATE_CATEGORY))?;

        Ok(row.into_category())
    }

    /// List every category, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, slug, created_at, updated_at
            FROM categories
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    /// Get a category by slug, together with its products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Category, Vec<Product>)>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, slug, created_at, updated_at
            FROM categories
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let category = row.into_category();

        let products = sqlx::query_as::<_, super::products::ProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.discount, p.quantity,
                   p.created_at, p.updated_at
            FROM products p
            JOIN product_categories pc ON pc.product_id = p.id
            WHERE pc.category_id = $1
            ORDER BY p.name ASC
            ",
        )
        .bind(category.id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(super::products::ProductRow::into_product)
        .collect();

        Ok(Some((category, products)))
    }

    /// Rename a category, recomputing its slug from the new name.
    ///
    /// The row is addressed by its *current* slug; on success the category
    /// is reachable under the new one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has the given
    /// slug, `RepositoryError::Conflict` if the new name or slug collides,
    /// `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        slug: &str,
        category: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        let new_slug = Slug::from_name(&category.name);

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE categories
            SET name = $2, description = $3, slug = $4, updated_at = now()
            WHERE slug = $1
            RETURNING id, name, description, slug, created_at, updated_at
            ",
        )
        .bind(slug)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&new_slug)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique_violation(e, DUPLICATE_CATEGORY))?;

        row.map(CategoryRow::into_category)
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category by slug. Product links cascade with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has the given
    /// slug, `RepositoryError::Database` for other failures.
    pub async fn delete(&self, slug: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
