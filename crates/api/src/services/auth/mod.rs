//! Authentication service.
//!
//! Sign-up, sign-in, and password changes. Passwords are hashed with
//! Argon2id; successful sign-up and sign-in both end in a freshly issued
//! session token.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use clementine_core::{Email, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::NewUser;
use crate::services::token::TokenService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw sign-up input, as received from the client.
#[derive(Debug)]
pub struct SignupInput<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub is_admin: bool,
}

/// Authentication service.
///
/// Handles registration, sign-in, and password changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new account and issue its first session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername`/`InvalidEmail` on malformed
    /// input, `AuthError::WeakPassword` if the password doesn't meet
    /// requirements, and `AuthError::UserAlreadyExists` if the username or
    /// email is taken.
    pub async fn sign_up(&self, input: SignupInput<'_>) -> Result<String, AuthError> {
        let username = Username::parse(input.username)?;
        let email = Email::parse(input.email)?;
        validate_password(input.password)?;

        let password_hash = hash_password(input.password)?;

        let user = self
            .users
            .create(&NewUser {
                username,
                email,
                password_hash,
                is_admin: input.is_admin,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(self.tokens.issue(&user)?)
    }

    /// Sign in with email and password, issuing a fresh session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the caller cannot tell which.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let (user, password_hash) = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(self.tokens.issue(&user)?)
    }

    /// Change an account's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SamePassword` if the new password matches the
    /// current one and `AuthError::WeakPassword` if it doesn't meet
    /// requirements.
    pub async fn change_password(
        &self,
        user_id: UserId,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let current_hash = self.users.password_hash(user_id).await?;

        if verify_password(new_password, &current_hash).is_ok() {
            return Err(AuthError::SamePassword);
        }

        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        self.users.update_password(user_id, &password_hash).await?;

        Ok(())
    }
}

/// Validate password meets requirements.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Public because the CLI's account tooling hashes through the same path.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("battery staple", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("correct horse").unwrap();
        let b = hash_password("correct horse").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
