//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{Email, UserId, Username};

/// An account as exposed to clients.
///
/// The password hash never leaves the repository layer; this type simply has
/// no field for it.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique account ID.
    pub id: UserId,
    /// Unique login/display name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Whether the account holds the admin role.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Profile fields a user may change about themselves.
///
/// The ID is immutable and the password has its own endpoint, so neither
/// appears here.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: Username,
    pub email: Email,
}
