//! Unified error handling.
//!
//! Provides a unified `AppError` that every route handler returns. Errors
//! serialize as a `{"error": "<message>"}` JSON envelope with the status
//! reflecting the failure class: 400 for bad input, 401 for anything
//! authorization-shaped, 500 for storage and internal failures. Not-found
//! is folded into the storage class and internal details are never exposed
//! to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::token::AccessError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing client input.
    #[error("Bad request: {0}")]
    Validation(String),

    /// Missing/invalid/expired token or a failed self/role check.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AccessError> for AppError {
    fn from(e: AccessError) -> Self {
        Self::Unauthorized(e.to_string())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists
                | AuthError::WeakPassword(_)
                | AuthError::SamePassword
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(RepositoryError::MissingReference(_)) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::Repository(_) | AuthError::Token(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Repository(err) => match err {
                RepositoryError::MissingReference(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing message. Storage and internal failures are
    /// replaced with a generic message.
    fn message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Unauthorized(msg) => msg.clone(),
            Self::Auth(err) => match err {
                AuthError::Repository(RepositoryError::MissingReference(msg)) => msg.clone(),
                AuthError::Repository(_) | AuthError::Token(_) | AuthError::PasswordHash => {
                    "Internal server error".to_owned()
                }
                other => other.to_string(),
            },
            Self::Repository(err) => match err {
                RepositoryError::MissingReference(msg) => msg.clone(),
                _ => "Internal server error".to_owned(),
            },
            Self::Internal(_) => "Internal server error".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthorized("no".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_folds_into_storage_class() {
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_is_a_persistence_error() {
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::Conflict(
                "slug".to_owned()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_reference_is_client_error() {
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::MissingReference(
                "unknown category".to_owned()
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_sign_in_failure_collapses() {
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.message(), "Invalid email or password");
        assert_eq!(get_status(err), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_details_are_shielded() {
        let err = AppError::Internal("connection string leaked".to_owned());
        assert_eq!(err.message(), "Internal server error");
    }
}
