//! Buyer identity: the key that owns a basket.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing a [`BuyerId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuyerIdError {
    /// The value is empty or whitespace only.
    #[error("buyer id cannot be empty")]
    Empty,
    /// The value is not an anonymous id minted by [`BuyerId::anonymous`].
    #[error("not an anonymous buyer id")]
    NotAnonymous,
}

/// The identity a basket belongs to.
///
/// Either the user name of an authenticated user or an anonymous token
/// (a UUID) handed to the browser in the `buyerId` cookie. Cookie values
/// only ever go through [`BuyerId::parse_anonymous`], so a browser cannot
/// claim a user name as its anonymous identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuyerId(String);

impl BuyerId {
    /// Parse a buyer id, rejecting empty and whitespace-only values.
    ///
    /// # Errors
    ///
    /// Returns [`BuyerIdError::Empty`] for blank input.
    pub fn parse(value: &str) -> Result<Self, BuyerIdError> {
        if value.trim().is_empty() {
            return Err(BuyerIdError::Empty);
        }
        Ok(Self(value.to_owned()))
    }

    /// Parse a value read from the `buyerId` cookie.
    ///
    /// Only UUIDs are accepted, normalized to the hyphenated lower-case form
    /// [`BuyerId::anonymous`] produces.
    ///
    /// # Errors
    ///
    /// Returns [`BuyerIdError::Empty`] for blank input and
    /// [`BuyerIdError::NotAnonymous`] for anything that is not a UUID.
    pub fn parse_anonymous(value: &str) -> Result<Self, BuyerIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(BuyerIdError::Empty);
        }
        Uuid::parse_str(value)
            .map(|id| Self(id.hyphenated().to_string()))
            .map_err(|_| BuyerIdError::NotAnonymous)
    }

    /// Whether `value` has the shape of an anonymous id. User names of this
    /// shape are refused at registration.
    #[must_use]
    pub fn looks_anonymous(value: &str) -> bool {
        Uuid::parse_str(value.trim()).is_ok()
    }

    /// Generate a fresh anonymous buyer id.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the buyer id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuyerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BuyerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for BuyerId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BuyerId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        <String as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for BuyerId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(BuyerId::parse(""), Err(BuyerIdError::Empty));
        assert_eq!(BuyerId::parse("   "), Err(BuyerIdError::Empty));
        assert_eq!(BuyerId::parse("bob").unwrap().as_str(), "bob");
    }

    #[test]
    fn test_parse_anonymous_accepts_only_uuids() {
        let minted = BuyerId::anonymous();
        assert_eq!(BuyerId::parse_anonymous(minted.as_str()), Ok(minted));

        assert_eq!(BuyerId::parse_anonymous("alice"), Err(BuyerIdError::NotAnonymous));
        assert_eq!(BuyerId::parse_anonymous("3f1b6c1e"), Err(BuyerIdError::NotAnonymous));
        assert_eq!(BuyerId::parse_anonymous(" "), Err(BuyerIdError::Empty));
    }

    #[test]
    fn test_parse_anonymous_normalizes_case() {
        let id = BuyerId::parse_anonymous("3F1B6C1E-0000-4000-8000-00000000ABCD").unwrap();
        assert_eq!(id.as_str(), "3f1b6c1e-0000-4000-8000-00000000abcd");
    }

    #[test]
    fn test_looks_anonymous() {
        assert!(BuyerId::looks_anonymous(BuyerId::anonymous().as_str()));
        assert!(BuyerId::looks_anonymous("3f1b6c1e00004000800000000000abcd"));
        assert!(!BuyerId::looks_anonymous("bob"));
    }

    #[test]
    fn test_anonymous_ids_are_uuids_and_distinct() {
        let a = BuyerId::anonymous();
        let b = BuyerId::anonymous();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
