//! Address repository.
//!
//! Every query is scoped by the owning user's ID, so a caller can never
//! reach another user's address by guessing its ID.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clementine_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::{Address, NewAddress};

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    address_name: String,
    receiver_name: String,
    receiver_phone_number: String,
    street_address: String,
    city: String,
    province: String,
    country: String,
    zip_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AddressRow {
    fn into_address(self) -> Address {
        Address {
            id: self.id,
            address_name: self.address_name,
            receiver_name: self.receiver_name,
            receiver_phone_number: self.receiver_phone_number,
            street_address: self.street_address,
            city: self.city,
            province: self.province,
            country: self.country,
            zip_code: self.zip_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const ADDRESS_COLUMNS: &str = "id, address_name, receiver_name, receiver_phone_number, \
     street_address, city, province, country, zip_code, created_at, updated_at";

/// Repository for address rows.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new address for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign key failure when the user row is gone).
    pub async fn create(
        &self,
        user_id: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            INSERT INTO addresses
                (id, user_id, address_name, receiver_name, receiver_phone_number,
                 street_address, city, province, country, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ADDRESS_COLUMNS}
            ",
        ))
        .bind(AddressId::generate())
        .bind(user_id)
        .bind(&address.address_name)
        .bind(&address.receiver_name)
        .bind(&address.receiver_phone_number)
        .bind(&address.street_address)
        .bind(&address.city)
        .bind(&address.province)
        .bind(&address.country)
        .bind(&address.zip_code)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_address())
    }

    /// List a user's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY created_at ASC",
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AddressRow::into_address).collect())
    }

    /// Get one of a user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2",
        ))
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(AddressRow::into_address))
    }

    /// Replace the fields of one of a user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no address with that ID
    /// belongs to the user, `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        user_id: UserId,
        address_id: AddressId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            UPDATE addresses
            SET address_name = $3, receiver_name = $4, receiver_phone_number = $5,
                street_address = $6, city = $7, province = $8, country = $9,
                zip_code = $10, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {ADDRESS_COLUMNS}
            ",
        ))
        .bind(address_id)
        .bind(user_id)
        .bind(&address.address_name)
        .bind(&address.receiver_name)
        .bind(&address.receiver_phone_number)
        .bind(&address.street_address)
        .bind(&address.city)
        .bind(&address.province)
        .bind(&address.country)
        .bind(&address.zip_code)
        .fetch_optional(self.pool)
        .await?;

        row.map(AddressRow::into_address)
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete one of a user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no address with that ID
    /// belongs to the user, `RepositoryError::Database` for other failures.
    pub async fn delete(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
