//! Product repository, including product/category link management.
//!
//! A product's category set has full-replace semantics: every write takes
//! the complete set of category IDs and the stored links end up exactly
//! equal to it. The clear-then-insert sequence runs inside one transaction,
//! so no request can observe a product with its links half-applied.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use clementine_core::{CategoryId, Discount, Price, ProductId, Quantity};

use super::categories::CategoryRow;
use super::RepositoryError;
use crate::models::{Category, NewProduct, Product, ProductDetail};

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    discount: Discount,
    quantity: Quantity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub(crate) fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            discount: self.discount,
            quantity: self.quantity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for product rows and their category links.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product and link it to the supplied categories, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if any category ID does
    /// not exist, `RepositoryError::Database` for other failures.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (id, name, description, price, discount, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, discount, quantity, created_at, updated_at
            ",
        )
        .bind(ProductId::generate())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.discount)
        .bind(product.quantity)
        .fetch_one(&mut *tx)
        .await?;

        replace_category_links(&mut tx, row.id, &product.categories).await?;

        tx.commit().await?;

        Ok(row.into_product())
    }

    /// List products, optionally filtered by a case-insensitive name
    /// substring. An empty or absent keyword returns everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, keyword: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", keyword.unwrap_or_default());

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, discount, quantity, created_at, updated_at
            FROM products
            WHERE name ILIKE $1
            ORDER BY name ASC
            ",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    /// Get a product with its categories and wishlist count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, discount, quantity, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let categories: Vec<Category> = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT c.id, c.name, c.description, c.slug, c.created_at, c.updated_at
            FROM categories c
            JOIN product_categories pc ON pc.category_id = c.id
            WHERE pc.product_id = $1
            ORDER BY c.name ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(CategoryRow::into_category)
        .collect();

        let (wishlist_count,): (i64,) =
            sqlx::query_as("SELECT count(*) FROM wishlist_items WHERE product_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(Some(ProductDetail {
            product: row.into_product(),
            categories,
            wishlist_count,
        }))
    }

    /// Replace a product's fields and its category links, in one
    /// transaction.
    ///
    /// The stored link set afterwards is exactly the supplied set: links to
    /// categories no longer listed are removed, new ones are added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::MissingReference` if any category ID does not
    /// exist, `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, discount = $5, quantity = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, price, discount, quantity, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.discount)
        .bind(product.quantity)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        replace_category_links(&mut tx, id, &product.categories).await?;

        tx.commit().await?;

        Ok(row.into_product())
    }

    /// Delete a product. Category links and wishlist rows cascade with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Insert the supplied category links for a product.
///
/// IDs are deduplicated, then checked for existence inside the same
/// transaction; a dangling ID aborts the whole write rather than leaving a
/// silent hole in the link set.
async fn replace_category_links(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    categories: &[CategoryId],
) -> Result<(), RepositoryError> {
    let mut ids: Vec<Uuid> = categories.iter().map(CategoryId::as_uuid).collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(());
    }

    let (known,): (i64,) = sqlx::query_as("SELECT count(*) FROM categories WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_one(&mut **tx)
        .await?;

    if known != i64::try_from(ids.len()).unwrap_or(i64::MAX) {
        return Err(RepositoryError::MissingReference(
            "one or more category ids do not exist".to_owned(),
        ));
    }

    sqlx::query(
        r"
        INSERT INTO product_categories (product_id, category_id)
        SELECT $1, unnest($2::uuid[])
        ",
    )
    .bind(product_id)
    .bind(&ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
