//! Address domain types.
//!
//! An address always belongs to exactly one user and is never authorized on
//! its own: every repository operation takes the owning user's ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clementine_core::AddressId;

/// A shipping address as exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Short label chosen by the user (e.g. "Home", "Office").
    pub address_name: String,
    pub receiver_name: String,
    pub receiver_phone_number: String,
    pub street_address: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing an address.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub address_name: String,
    pub receiver_name: String,
    pub receiver_phone_number: String,
    pub street_address: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub zip_code: String,
}
