//! Catalog product identifiers.
//!
//! The remote catalog numbers its products with small positive integers.
//! Wrapping them in [`ProductId`] keeps them from being mixed up with
//! quantities or counts, which are also plain integers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`] from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty.
    #[error("product id cannot be empty")]
    Empty,
    /// The input is not an integer.
    #[error("product id must be an integer, got {0:?}")]
    NotANumber(String),
}

/// Identifier of a product in the remote catalog.
///
/// Serializes as a bare JSON number, matching the catalog's wire format.
///
/// ```rust
/// # use fakestore_core::ProductId;
/// let id: ProductId = "7".parse().unwrap();
/// assert_eq!(id, ProductId::new(7));
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ProductIdError::NotANumber(trimmed.to_string()))
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_id() {
        assert_eq!("12".parse::<ProductId>().unwrap(), ProductId::new(12));
        assert_eq!(" 3 ".parse::<ProductId>().unwrap(), ProductId::new(3));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!("".parse::<ProductId>(), Err(ProductIdError::Empty));
        assert_eq!("   ".parse::<ProductId>(), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            "abc".parse::<ProductId>(),
            Err(ProductIdError::NotANumber(s)) if s == "abc"
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let parsed: ProductId = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, id);
    }
}
