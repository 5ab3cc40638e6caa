//! Application state shared by every front end.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::storage::{FileStorage, Storage};
use crate::wishlist::WishlistStore;

/// Application state: the catalog client and both stores.
///
/// This struct is cheaply cloneable via `Arc`. Building it wires the catalog
/// cache to the wishlist: every wishlist change drops all cached catalog
/// reads so product views are fetched again.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl AppState {
    /// Create application state persisting to files under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create application state on top of an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let wishlist = WishlistStore::load(storage);

        let invalidate = catalog.clone();
        wishlist.on_change(move |event| {
            tracing::debug!(product_id = %event.product_id(), "Wishlist changed");
            invalidate.invalidate_all();
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: CartStore::new(),
                wishlist,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the wishlist.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }
}
