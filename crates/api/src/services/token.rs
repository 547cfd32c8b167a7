//! Session token issuance and verification.
//!
//! Tokens are stateless: the signed payload carries everything needed to
//! authorize a request, nothing is stored server-side, and expiry is the
//! only revocation. There is no refresh mechanism; an expired token means a
//! new sign-in.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clementine_core::{Role, UserId};

use crate::models::User;

/// How long an issued token stays valid.
const TOKEN_TTL_HOURS: i64 = 24;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's signature or format is wrong.
    #[error("invalid token")]
    Invalid,
    /// The token was valid once but its expiry has passed.
    #[error("token is expired")]
    Expired,
    /// Signing failed; a configuration problem, not a client error.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Errors from authorization checks on a verified claim.
///
/// Both variants surface identically to the caller; the distinction only
/// exists for logging.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The claim's subject is not the user being operated on.
    #[error("Unauthorized")]
    NotSelf,
    /// The claim does not carry the admin role.
    #[error("Unauthorized")]
    NotAdmin,
}

/// The verified identity payload carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account ID.
    pub sub: UserId,
    /// Username at issuance time.
    pub username: String,
    /// Role at issuance time; a promoted or demoted account keeps its old
    /// role until the next sign-in.
    pub role: Role,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expires-at (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Permit only the user the claim belongs to.
    ///
    /// Denial happens before any storage access: handlers call this first
    /// and only then touch the repository.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotSelf`] if the claim's subject differs from
    /// `user_id`, regardless of role.
    pub fn require_self(&self, user_id: UserId) -> Result<&Self, AccessError> {
        if self.sub == user_id {
            Ok(self)
        } else {
            Err(AccessError::NotSelf)
        }
    }

    /// Permit only admin claims.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotAdmin`] if the claim's role is not admin.
    pub fn require_admin(&self) -> Result<&Self, AccessError> {
        if self.role.is_admin() {
            Ok(self)
        } else {
            Err(AccessError::NotAdmin)
        }
    }
}

/// Issues and verifies signed session tokens.
///
/// Built once at startup from the configured secret and shared read-only
/// across all requests.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for an account.
    ///
    /// The claim carries the account's ID, username, and role (derived from
    /// the admin flag), and expires 24 hours from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails; this is a fatal
    /// configuration-class error, never caused by client input.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.to_string(),
            role: Role::from_admin_flag(user.is_admin),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return its claim.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] if the expiry has passed and
    /// [`TokenError::Invalid`] for any signature or format problem.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
