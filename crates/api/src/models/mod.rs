//! Domain types for the API.
//!
//! These are validated domain objects, separate from database row types and
//! from the request payloads defined next to the route handlers.

pub mod address;
pub mod category;
pub mod product;
pub mod user;

pub use address::{Address, NewAddress};
pub use category::{Category, NewCategory};
pub use product::{NewProduct, Product, ProductDetail};
pub use user::{NewUser, User, UserUpdate};
