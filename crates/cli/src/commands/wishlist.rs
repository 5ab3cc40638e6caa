//! Wishlist commands.
//!
//! The wishlist lives in `FAKESTORE_DATA_DIR` and survives between runs
//! (unless `--ephemeral` is given).

use fakestore_core::ProductId;
use fakestore_storefront::error::{AppError, Result};
use fakestore_storefront::state::AppState;

use crate::render;

/// Print the saved products.
pub fn list(state: &AppState) {
    println!("{}", render::wishlist(&state.wishlist().snapshot()));
}

/// Save a product, fetching it from the catalog.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched or does not exist.
pub async fn add(state: &AppState, id: ProductId) -> Result<()> {
    if state.wishlist().is_in_wishlist(id) {
        println!("Product {id} is already in your wishlist");
        return Ok(());
    }
    let product = state.catalog().fetch_product(id).await?;
    let title = product.title.clone();
    state.wishlist().add_to_wishlist(product);
    println!("Saved {title} to your wishlist");
    Ok(())
}

/// Forget a saved product. No network access.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the product is not saved.
pub fn remove(state: &AppState, id: ProductId) -> Result<()> {
    let product = state
        .wishlist()
        .product(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id} is not in your wishlist")))?;
    state.wishlist().remove_from_wishlist(id);
    println!("Removed {} from your wishlist", product.title);
    Ok(())
}

/// Remove a saved product, or save an unsaved one.
///
/// # Errors
///
/// Returns an error if an unsaved product cannot be fetched.
pub async fn toggle(state: &AppState, id: ProductId) -> Result<()> {
    if state.wishlist().is_in_wishlist(id) {
        remove(state, id)
    } else {
        add(state, id).await
    }
}
