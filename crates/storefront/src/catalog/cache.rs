//! Cache types for catalog API responses.

use core::fmt;

use fakestore_core::{Product, ProductId};

/// Identity of a catalog read.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum QueryKey {
    Products,
    Product(ProductId),
}

impl QueryKey {
    /// Path of the endpoint serving this query, relative to the API base.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Products => "products".to_string(),
            Self::Product(id) => format!("products/{id}"),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Products => f.write_str("products"),
            Self::Product(id) => write!(f, "product:{id}"),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub(super) enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
}
