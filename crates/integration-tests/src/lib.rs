//! Integration tests for the FakeStore storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fakestore-integration-tests
//! ```
//!
//! Tests talk to a [`FakeCatalog`]: an axum server on an ephemeral local port
//! that serves `GET /products` and `GET /products/{id}` the way the real
//! catalog does, counts the requests it receives, and can be switched into
//! failure modes.
//!
//! # Test Categories
//!
//! - `catalog_cache` - freshness window, invalidation, in-flight races
//! - `catalog_errors` - status, decode, not-found and transport failures
//! - `storefront_wiring` - `AppState` wiring and wishlist persistence

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fakestore_core::{Price, Product, ProductId, Rating};
use fakestore_storefront::config::{CatalogConfig, StorefrontConfig};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the fake catalog answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Serve the configured products.
    Healthy,
    /// Answer every request with this status.
    Failing(StatusCode),
    /// Answer 200 with a body that is not product JSON.
    Malformed,
    /// Serve the configured products after a delay.
    Slow(Duration),
}

/// Local stand-in for the remote catalog API.
///
/// The server task is aborted when the value is dropped.
pub struct FakeCatalog {
    addr: SocketAddr,
    inner: Arc<FakeCatalogInner>,
    task: JoinHandle<()>,
}

struct FakeCatalogInner {
    products: RwLock<Vec<Product>>,
    mode: RwLock<Mode>,
    list_requests: AtomicUsize,
    detail_requests: AtomicUsize,
}

impl FakeCatalog {
    /// Start serving `products` on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(products: Vec<Product>) -> Self {
        let inner = Arc::new(FakeCatalogInner {
            products: RwLock::new(products),
            mode: RwLock::new(Mode::Healthy),
            list_requests: AtomicUsize::new(0),
            detail_requests: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(show_product))
            .with_state(Arc::clone(&inner));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind fake catalog: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("fake catalog has no local address: {e}"));

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, inner, task }
    }

    /// Start serving [`sample_products`].
    pub async fn start_with_samples() -> Self {
        Self::start(sample_products()).await
    }

    /// Base URL to point a catalog client at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Catalog configuration targeting this server with `cache_ttl` freshness.
    ///
    /// # Panics
    ///
    /// Panics if the base URL does not parse, which cannot happen for a
    /// socket address.
    #[must_use]
    pub fn catalog_config(&self, cache_ttl: Duration) -> CatalogConfig {
        CatalogConfig {
            cache_ttl,
            request_timeout: Duration::from_secs(5),
            ..CatalogConfig::with_base_url(&self.base_url())
                .unwrap_or_else(|e| panic!("invalid fake catalog url: {e}"))
        }
    }

    /// Storefront configuration targeting this server, storing data in `data_dir`.
    #[must_use]
    pub fn storefront_config(&self, data_dir: impl Into<PathBuf>) -> StorefrontConfig {
        StorefrontConfig {
            catalog: self.catalog_config(Duration::from_secs(60)),
            data_dir: data_dir.into(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Switch how subsequent requests are answered.
    pub fn set_mode(&self, mode: Mode) {
        *self
            .inner
            .mode
            .write()
            .unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Replace the served products.
    pub fn set_products(&self, products: Vec<Product>) {
        *self
            .inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner) = products;
    }

    /// Number of `GET /products` requests received.
    #[must_use]
    pub fn list_requests(&self) -> usize {
        self.inner.list_requests.load(Ordering::SeqCst)
    }

    /// Number of `GET /products/{id}` requests received.
    #[must_use]
    pub fn detail_requests(&self) -> usize {
        self.inner.detail_requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl FakeCatalogInner {
    fn mode(&self) -> Mode {
        *self.mode.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn products(&self) -> Vec<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Answer for the current mode, or `None` to serve normally.
    async fn override_response(&self) -> Option<Response> {
        match self.mode() {
            Mode::Healthy => None,
            Mode::Failing(status) => Some((status, "catalog unavailable").into_response()),
            Mode::Malformed => Some((StatusCode::OK, "<html>maintenance</html>").into_response()),
            Mode::Slow(delay) => {
                tokio::time::sleep(delay).await;
                None
            }
        }
    }
}

async fn list_products(State(catalog): State<Arc<FakeCatalogInner>>) -> Response {
    catalog.list_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = catalog.override_response().await {
        return response;
    }
    Json(catalog.products()).into_response()
}

async fn show_product(
    State(catalog): State<Arc<FakeCatalogInner>>,
    Path(id): Path<i64>,
) -> Response {
    catalog.detail_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = catalog.override_response().await {
        return response;
    }
    match catalog.products().into_iter().find(|p| p.id == ProductId::new(id)) {
        Some(product) => Json(product).into_response(),
        // The real catalog answers unknown ids with an empty 200
        None => StatusCode::OK.into_response(),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A product with a fixed rating and the given price in cents.
///
/// # Panics
///
/// Panics if `cents` is negative.
#[must_use]
pub fn product(id: i64, title: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Price::from_cents(cents).unwrap_or_else(|e| panic!("invalid price: {e}")),
        description: format!("Description of {title}"),
        category: "men's clothing".to_string(),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
        rating: Rating::new(Decimal::new(39, 1), 120),
    }
}

/// A small catalog resembling the real one.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Fjallraven - Foldsack No. 1 Backpack", 10995),
        product(2, "Mens Casual Premium Slim Fit T-Shirts", 2230),
        product(3, "Mens Cotton Jacket", 5599),
    ]
}
