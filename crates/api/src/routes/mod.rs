//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (pings the database)
//!
//! # Users
//! POST   /api/users/signup        - Register, returns access token (201)
//! POST   /api/users/signin        - Sign in, returns access token
//! GET    /api/users               - List accounts (admin)
//! GET    /api/users/{id}          - Get account (self)
//! GET    /api/users/{id}/wishlist - Wishlisted products (self)
//! PATCH  /api/users/{id}          - Update profile (self)
//! PATCH  /api/users/{id}/password - Change password (self)
//! DELETE /api/users/{id}          - Delete account (self)
//!
//! # Addresses (all self)
//! POST   /api/users/{id}/addresses
//! GET    /api/users/{id}/addresses
//! GET    /api/users/{id}/addresses/{address_id}
//! PATCH  /api/users/{id}/addresses/{address_id}
//! DELETE /api/users/{id}/addresses/{address_id}
//!
//! # Products
//! GET    /api/products            - List/search (public)
//! GET    /api/products/{id}       - Detail with categories (public)
//! POST   /api/products            - Create (admin)
//! PATCH  /api/products/{id}       - Update incl. category replace (admin)
//! DELETE /api/products/{id}       - Delete (admin)
//! POST   /api/products/{id}/wishlist - Toggle wishlist (authenticated)
//!
//! # Categories
//! GET    /api/categories          - List (public)
//! GET    /api/categories/{slug}   - Detail with products (public)
//! POST   /api/categories          - Create (admin)
//! PATCH  /api/categories/{slug}   - Rename, re-derives slug (admin)
//! DELETE /api/categories/{slug}   - Delete (admin)
//! ```

pub mod addresses;
pub mod categories;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the user routes router (addresses nest under it).
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(users::sign_up))
        .route("/signin", post(users::sign_in))
        .route("/", get(users::index))
        .route(
            "/{id}",
            get(users::show).patch(users::update).delete(users::remove),
        )
        .route("/{id}/password", patch(users::update_password))
        .route("/{id}/wishlist", get(users::wishlist))
        .route(
            "/{id}/addresses",
            get(addresses::index).post(addresses::create),
        )
        .route(
            "/{id}/addresses/{address_id}",
            get(addresses::show)
                .patch(addresses::update)
                .delete(addresses::remove),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::remove),
        )
        .route("/{id}/wishlist", post(products::toggle_wishlist))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{slug}",
            get(categories::show)
                .patch(categories::update)
                .delete(categories::remove),
        )
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes());

    Router::new().nest("/api", api)
}
