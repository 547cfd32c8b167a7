//! Wishlist membership repository.
//!
//! Membership is a single relationship table; "a user's wishlist" and "a
//! product's wishlisters" are two read projections of the same rows, so the
//! two directions can never diverge.

use std::hash::{DefaultHasher, Hash, Hasher};

use sqlx::PgPool;

use clementine_core::{ProductId, UserId};

use super::products::ProductRow;
use super::RepositoryError;
use crate::models::Product;

/// The outcome of a wishlist toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    /// The product was not wishlisted and now is.
    Added,
    /// The product was wishlisted and no longer is.
    Removed,
}

/// Repository for wishlist membership rows.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Toggle a user's wishlist membership for a product.
    ///
    /// Runs inside one transaction holding an advisory lock keyed by the
    /// (user, product) pair, so two concurrent toggles for the same pair
    /// serialize instead of racing the membership check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn toggle(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistChange, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(pair_lock_key(user_id, product_id))
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query(
            "DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let change = if removed == 0 {
            sqlx::query("INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(product_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(ref db_err) = e
                        && db_err.is_foreign_key_violation()
                    {
                        return RepositoryError::NotFound;
                    }
                    RepositoryError::Database(e)
                })?;
            WishlistChange::Added
        } else {
            WishlistChange::Removed
        };

        tx.commit().await?;

        Ok(change)
    }

    /// The products a user currently has wishlisted, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.discount, p.quantity,
                   p.created_at, p.updated_at
            FROM products p
            JOIN wishlist_items w ON w.product_id = p.id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }
}

/// Derive the advisory lock key for a (user, product) pair.
///
/// Both toggles of the same pair must land on the same key; collisions
/// between different pairs only cost unnecessary serialization, never
/// correctness.
fn pair_lock_key(user_id: UserId, product_id: ProductId) -> i64 {
    let mut hasher = DefaultHasher::new();
    user_id.as_uuid().hash(&mut hasher);
    product_id.as_uuid().hash(&mut hasher);

    #[allow(clippy::cast_possible_wrap)] // the lock key space is the full i64 range
    {
        hasher.finish() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_is_stable() {
        let user = UserId::generate();
        let product = ProductId::generate();
        assert_eq!(
            pair_lock_key(user, product),
            pair_lock_key(user, product)
        );
    }

    #[test]
    fn test_lock_key_direction_matters() {
        // Different pairs should usually get different keys.
        let user = UserId::generate();
        let a = ProductId::generate();
        let b = ProductId::generate();
        assert_ne!(pair_lock_key(user, a), pair_lock_key(user, b));
    }
}
