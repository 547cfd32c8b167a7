//! Catalog quantity types: price, discount, stock quantity.
//!
//! All three are validated at the boundary so the rest of the code never
//! sees a negative price, a negative stock count, or a discount above 100.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price must not be negative")]
    Negative,
}

/// A price in the smallest currency unit (e.g. cents).
///
/// There is no fractional arithmetic anywhere: prices are integral minor
/// units end to end, matching the storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(i64);

impl Price {
    /// Create a price from an amount in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub const fn new(minor_units: i64) -> Result<Self, PriceError> {
        if minor_units < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self(minor_units))
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Price> for i64 {
    fn from(p: Price) -> Self {
        p.0
    }
}

/// Errors that can occur when constructing a [`Discount`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum DiscountError {
    /// The percentage exceeds 100.
    #[error("discount must be between 0 and 100")]
    OutOfRange,
}

/// A discount percentage between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub struct Discount(u8);

impl Discount {
    /// The maximum discount percentage.
    pub const MAX: u8 = 100;

    /// Create a discount percentage.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::OutOfRange`] if the percentage exceeds 100.
    pub const fn new(percent: u8) -> Result<Self, DiscountError> {
        if percent > Self::MAX {
            return Err(DiscountError::OutOfRange);
        }
        Ok(Self(percent))
    }

    /// The percentage value.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Discount {
    type Error = DiscountError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Discount> for u8 {
    fn from(d: Discount) -> Self {
        d.0
    }
}

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum QuantityError {
    /// The count is negative.
    #[error("quantity must not be negative")]
    Negative,
}

/// A non-negative stock count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    /// Create a stock count.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Negative`] if the count is below zero.
    pub const fn new(count: i64) -> Result<Self, QuantityError> {
        if count < 0 {
            return Err(QuantityError::Negative);
        }
        Ok(Self(count))
    }

    /// The stock count.
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Quantity> for i64 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

// SQLx support (with postgres feature).
//
// Price and Quantity map to BIGINT; Discount maps to SMALLINT. Database
// values are constrained by CHECK clauses, so decoding assumes validity.
#[cfg(feature = "postgres")]
mod pg {
    use super::{Discount, Price, Quantity};

    macro_rules! delegate_i64 {
        ($name:ident, $accessor:ident) => {
            impl sqlx::Type<sqlx::Postgres> for $name {
                fn type_info() -> sqlx::postgres::PgTypeInfo {
                    <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
                }

                fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                    <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
                }
            }

            impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
                fn decode(
                    value: sqlx::postgres::PgValueRef<'r>,
                ) -> Result<Self, sqlx::error::BoxDynError> {
                    let v = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                    Ok(Self::new(v)?)
                }
            }

            impl sqlx::Encode<'_, sqlx::Postgres> for $name {
                fn encode_by_ref(
                    &self,
                    buf: &mut sqlx::postgres::PgArgumentBuffer,
                ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                    <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(
                        &self.$accessor(),
                        buf,
                    )
                }
            }
        };
    }

    delegate_i64!(Price, minor_units);
    delegate_i64!(Quantity, count);

    impl sqlx::Type<sqlx::Postgres> for Discount {
        fn type_info() -> sqlx::postgres::PgTypeInfo {
            <i16 as sqlx::Type<sqlx::Postgres>>::type_info()
        }

        fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
            <i16 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
        }
    }

    impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Discount {
        fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
            let v = <i16 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
            let percent = u8::try_from(v)?;
            Ok(Self::new(percent)?)
        }
    }

    impl sqlx::Encode<'_, sqlx::Postgres> for Discount {
        fn encode_by_ref(
            &self,
            buf: &mut sqlx::postgres::PgArgumentBuffer,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <i16 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(
                &i16::from(self.percent()),
                buf,
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rejects_negative() {
        assert!(matches!(Price::new(-1), Err(PriceError::Negative)));
        assert!(Price::new(0).is_ok());
        assert!(Price::new(19_99).is_ok());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(Discount::new(0).is_ok());
        assert!(Discount::new(100).is_ok());
        assert!(matches!(Discount::new(101), Err(DiscountError::OutOfRange)));
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert!(matches!(Quantity::new(-5), Err(QuantityError::Negative)));
        assert!(Quantity::new(0).is_ok());
    }

    #[test]
    fn test_price_serde_validates() {
        let p: Price = serde_json::from_str("1999").unwrap();
        assert_eq!(p.minor_units(), 1999);
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn test_discount_serde_validates() {
        let d: Discount = serde_json::from_str("35").unwrap();
        assert_eq!(d.percent(), 35);
        assert!(serde_json::from_str::<Discount>("101").is_err());
    }
}
