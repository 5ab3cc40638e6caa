//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP and caches decoded responses with `moka`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fakestore_core::{Product, ProductId};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::cache::{CacheValue, QueryKey};
use super::query::QueryState;
use super::CatalogError;
use crate::config::{CatalogConfig, MAX_CACHE_TTL};

/// Longest slice of a response body kept in logs and errors.
const BODY_EXCERPT_CHARS: usize = 200;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
/// Successful reads are cached for the configured freshness window.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<QueryKey, CacheValue>,
    /// Bumped by every invalidation. A fetch only caches its result if no
    /// invalidation happened while it was in flight.
    generation: AtomicU64,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// A `cache_ttl` above [`MAX_CACHE_TTL`] is capped to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl.min(MAX_CACHE_TTL))
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("fakestore/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.to_string(),
                cache,
                generation: AtomicU64::new(0),
            }),
        })
    }

    /// Issue a GET for `key` and return the raw body of a success response.
    async fn get_body(&self, key: QueryKey) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.inner.base_url, key.path());

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %excerpt(&body),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                body: excerpt(&body),
            });
        }

        Ok(body)
    }

    /// Cache `value` under `key` unless the cache was invalidated after
    /// `generation` was read.
    async fn store(&self, key: QueryKey, generation: u64, value: CacheValue) {
        if self.generation() != generation {
            debug!(%key, "Discarding response that raced an invalidation");
            return;
        }
        self.inner.cache.insert(key, value).await;

        // An invalidation may have slipped in between the check and the insert
        if self.generation() != generation {
            self.inner.cache.invalidate(&key).await;
        }
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] or [`CatalogError::Status`] if the
    /// request fails, and [`CatalogError::Decode`] if the body is not a list
    /// of products.
    #[instrument(skip(self))]
    pub async fn fetch_product_list(&self) -> Result<Vec<Product>, CatalogError> {
        let key = QueryKey::Products;

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let generation = self.generation();
        let body = self.get_body(key).await?;
        let products: Vec<Product> = decode(&body)?;
        debug!(count = products.len(), "Fetched product list");

        self.store(key, generation, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the catalog has no such product,
    /// and the same errors as [`Self::fetch_product_list`] otherwise.
    #[instrument(skip(self))]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = QueryKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let generation = self.generation();
        let body = self.get_body(key).await?;

        // The catalog answers unknown ids with 200 and an empty body
        if body.trim().is_empty() {
            return Err(CatalogError::NotFound(format!("product {id}")));
        }
        let product: Option<Product> = decode(&body)?;
        let product = product.ok_or_else(|| CatalogError::NotFound(format!("product {id}")))?;

        self.store(key, generation, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// The product list as a [`QueryState`].
    pub async fn query_products(&self) -> QueryState<Vec<Product>> {
        QueryState::from_result(self.fetch_product_list().await)
    }

    /// A single product as a [`QueryState`].
    ///
    /// The query is disabled while `id` is `None`: nothing is requested and
    /// the state is [`QueryState::Idle`].
    pub async fn query_product(&self, id: Option<ProductId>) -> QueryState<Product> {
        match id {
            Some(id) => QueryState::from_result(self.fetch_product(id).await),
            None => QueryState::Idle,
        }
    }

    // =========================================================================
    // Cache Invalidation
    // =========================================================================

    /// Drop the cached result for `key`; the next read goes to the network.
    pub async fn invalidate(&self, key: QueryKey) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.cache.invalidate(&key).await;
    }

    /// Drop every cached result.
    pub fn invalidate_all(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.cache.invalidate_all();
        debug!("Catalog cache invalidated");
    }

    /// Whether a result for `key` is currently cached and fresh.
    pub async fn is_cached(&self, key: QueryKey) -> bool {
        self.inner.cache.get(&key).await.is_some()
    }
}

/// Decode a JSON body, logging the start of it on failure.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %excerpt(body),
            "Failed to decode catalog response"
        );
        CatalogError::Decode(e)
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
