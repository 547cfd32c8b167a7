//! URL-safe category slugs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A URL-safe, lowercase, hyphenated derivation of a display name.
///
/// Slugs are the stable lookup key for categories. A slug is always the
/// deterministic derivation of the category's *current* name and is
/// recomputed on every rename; uniqueness is enforced by the storage layer,
/// not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a display name.
    ///
    /// ASCII letters and digits are kept (lowercased); every other run of
    /// characters collapses into a single hyphen. Leading and trailing
    /// hyphens never appear.
    ///
    /// ```
    /// # use clementine_core::Slug;
    /// assert_eq!(Slug::from_name("Home & Garden").as_str(), "home-garden");
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut out = String::with_capacity(name.len());
        let mut gap = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if gap && !out.is_empty() {
                    out.push('-');
                }
                gap = false;
                out.push(c.to_ascii_lowercase());
            } else {
                gap = true;
            }
        }

        Self(out)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_derivation() {
        assert_eq!(Slug::from_name("Electronics").as_str(), "electronics");
        assert_eq!(Slug::from_name("Home & Garden").as_str(), "home-garden");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(Slug::from_name("home garden!").as_str(), "home-garden");
        assert_eq!(Slug::from_name("a  --  b").as_str(), "a-b");
    }

    #[test]
    fn test_no_leading_or_trailing_hyphens() {
        assert_eq!(Slug::from_name("  Kitchen  ").as_str(), "kitchen");
        assert_eq!(Slug::from_name("!wow!").as_str(), "wow");
    }

    #[test]
    fn test_deterministic() {
        let a = Slug::from_name("Home & Garden");
        let b = Slug::from_name("Home & Garden");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_names_may_collide() {
        // Collisions are legitimate at this layer; the unique constraint in
        // storage is what rejects them.
        assert_eq!(
            Slug::from_name("Home & Garden"),
            Slug::from_name("home garden!")
        );
    }
}
