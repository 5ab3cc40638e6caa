//! Remote catalog API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`: `GET /products` and `GET /products/{id}`
//! - The catalog is the source of truth; nothing is synced locally
//! - In-memory caching via `moka`, keyed by [`QueryKey`], with a configurable
//!   freshness window
//! - Consumers see results as a [`QueryState`]; [`QueryTracker`] drops
//!   responses that arrive after a newer request was issued
//!
//! # Example
//!
//! ```rust,ignore
//! use fakestore_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let products = client.fetch_product_list().await?;
//! let product = client.fetch_product(products[0].id).await?;
//!
//! // After the wishlist changes
//! client.invalidate_all();
//! ```

mod cache;
mod client;
mod query;

pub use cache::QueryKey;
pub use client::CatalogClient;
pub use query::{QueryState, QueryTicket, QueryTracker};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Start of the response body.
        body: String,
    },

    /// The response body is not the expected product shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog has no product with this id.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Whether the failure happened at the transport or HTTP level.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Message suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Status { .. } => "Failed to fetch products".to_string(),
            Self::Decode(_) => "Received malformed product data".to_string(),
            Self::NotFound(_) => "Product not found".to_string(),
        }
    }
}
