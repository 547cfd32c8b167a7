//! Request extractors.
//!
//! - [`auth`] - Bearer token verification into a typed claim
//! - [`json`] - JSON body extraction with errors in the API envelope

pub mod auth;
pub mod json;

pub use auth::CurrentUser;
pub use json::AppJson;
