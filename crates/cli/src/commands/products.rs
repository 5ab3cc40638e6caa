//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! fakestore products
//!
//! # Show one product
//! fakestore products show 3
//! ```

use fakestore_core::ProductId;
use fakestore_storefront::error::Result;
use fakestore_storefront::state::AppState;

use crate::render;

/// Print the product list, marking wishlisted products.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(state: &AppState) -> Result<()> {
    let products = state.catalog().fetch_product_list().await?;
    println!(
        "{}",
        render::product_list(&products, &state.wishlist().snapshot())
    );
    Ok(())
}

/// Print the detail page of one product.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched or does not exist.
pub async fn show(state: &AppState, id: ProductId) -> Result<()> {
    let product = state.catalog().fetch_product(id).await?;
    println!(
        "{}",
        render::product_detail(&product, state.wishlist().is_in_wishlist(id), None)
    );
    Ok(())
}
