//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! clem-cli admin create -u admin -e admin@example.com -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use sqlx::PgPool;
use thiserror::Error;

use clementine_api::db::{RepositoryError, UserRepository};
use clementine_api::models::NewUser;
use clementine_api::services::auth::{self, AuthError};
use clementine_core::{Email, EmailError, Username, UsernameError};

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password validation or hashing failure.
    #[error("Password error: {0}")]
    Password(#[from] AuthError),

    /// Account already exists.
    #[error("An account already exists with that username or email")]
    UserExists,

    /// Repository failure.
    #[error("Database error: {0}")]
    Repository(RepositoryError),
}

/// Create a new admin account.
///
/// # Errors
///
/// Returns `AdminError` if the input is invalid, the account already
/// exists, or the database is unreachable.
pub async fn create(username: &str, email: &str, password: &str) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let username = Username::parse(username)?;
    let email = Email::parse(email)?;
    auth::validate_password(password)?;
    let password_hash = auth::hash_password(password)?;

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| AdminError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin account: {} ({})", username, email);

    let user = UserRepository::new(&pool)
        .create(&NewUser {
            username,
            email,
            password_hash,
            is_admin: true,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists,
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Admin account created with id {}", user.id);
    Ok(())
}
