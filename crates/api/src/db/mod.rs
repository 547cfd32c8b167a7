//! Database access for the API.
//!
//! # Tables
//!
//! - `users` - Accounts (username/email unique, argon2 password hash)
//! - `addresses` - Per-user shipping addresses (cascade-deleted)
//! - `products`, `categories` - The catalog
//! - `product_categories` - Product/category links (full-replace on update)
//! - `wishlist_items` - User/product wishlist membership (single toggle)
//!
//! Each table gets a repository struct borrowing the pool. Multi-step
//! mutations (category replace, wishlist toggle) run inside a single
//! transaction so no partial link state is ever observable.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p clementine-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod addresses;
pub mod categories;
pub mod products;
pub mod users;
pub mod wishlist;

pub use addresses::AddressRepository;
pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use users::UserRepository;
pub use wishlist::{WishlistChange, WishlistRepository};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint rejected the write (duplicate username,
    /// email, category name, or slug).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// A supplied reference points at a row that does not exist
    /// (e.g. a category ID on a product write).
    #[error("unknown reference: {0}")]
    MissingReference(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into [`Self::Conflict`]
    /// with the given message.
    fn on_unique_violation(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
