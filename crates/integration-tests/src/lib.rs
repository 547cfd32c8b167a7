//! Integration test helpers for Clementine.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p clementine-cli -- migrate
//!
//! # Start the API
//! cargo run -p clementine-api
//!
//! # Run integration tests
//! cargo test -p clementine-integration-tests -- --ignored
//! ```
//!
//! Tests create uniquely named accounts and catalog entries per run, so
//! they can be re-run against the same database without cleanup.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Create an HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique, valid username/name fragment for this test run.
#[must_use]
pub fn unique(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    // Usernames are capped at 24 chars
    format!("{prefix}-{}", &suffix[..12])
}

/// Sign up a fresh account and return its access token.
///
/// # Panics
///
/// Panics if the signup request fails or returns no token.
pub async fn sign_up(client: &Client, username: &str, password: &str, is_admin: bool) -> String {
    let resp = client
        .post(format!("{}/api/users/signup", base_url()))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
            "is_admin": is_admin,
        }))
        .send()
        .await
        .expect("Failed to sign up");

    assert_eq!(resp.status(), 201, "signup should return 201");

    let body: Value = resp.json().await.expect("Failed to read signup response");
    body["access_token"]
        .as_str()
        .expect("signup response should carry access_token")
        .to_owned()
}

/// Decode the (unverified) payload of a token and return a claim field.
///
/// Only for test assertions: the server is the one doing real verification.
///
/// # Panics
///
/// Panics if the token is not a well-formed three-segment token.
#[must_use]
pub fn claim(token: &str, field: &str) -> Value {
    let payload = token
        .split('.')
        .nth(1)
        .expect("token should have three segments");
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .expect("token payload should be base64url");
    let value: Value = serde_json::from_slice(&bytes).expect("token payload should be JSON");
    value[field].clone()
}

/// The subject (account ID) carried by a token.
///
/// # Panics
///
/// Panics if the token carries no string subject.
#[must_use]
pub fn token_subject(token: &str) -> String {
    claim(token, "sub")
        .as_str()
        .expect("token should carry a sub claim")
        .to_owned()
}
