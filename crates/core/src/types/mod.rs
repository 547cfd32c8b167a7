//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod email;
pub mod id;
pub mod role;
pub mod slug;
pub mod username;

pub use catalog::{Discount, DiscountError, Price, PriceError, Quantity, QuantityError};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
pub use slug::Slug;
pub use username::{Username, UsernameError};
