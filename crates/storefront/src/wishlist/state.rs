//! Wishlist state and its transition function.

use std::collections::HashSet;

use fakestore_core::{Product, ProductId};
use serde::Serialize;

/// Products the shopper saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WishlistState {
    /// Insertion order, unique by product id.
    pub items: Vec<Product>,
}

impl WishlistState {
    /// Whether a product with `id` is saved.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Commands accepted by the wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    Add(Product),
    Remove(ProductId),
    /// Replace the contents, e.g. with what was read from storage.
    Load(Vec<Product>),
}

impl WishlistAction {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Load(_) => "load",
        }
    }
}

/// Apply `action` to `state`, returning the next state.
///
/// Adding a saved product and removing an unsaved one are no-ops. Loading
/// keeps the first occurrence of each id so hand-edited storage cannot
/// introduce duplicates.
#[must_use]
pub fn reduce(state: &WishlistState, action: WishlistAction) -> WishlistState {
    match action {
        WishlistAction::Add(product) => {
            if state.contains(product.id) {
                return state.clone();
            }
            let mut items = state.items.clone();
            items.push(product);
            WishlistState { items }
        }
        WishlistAction::Remove(id) => WishlistState {
            items: state
                .items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect(),
        },
        WishlistAction::Load(products) => {
            let mut seen = HashSet::new();
            WishlistState {
                items: products
                    .into_iter()
                    .filter(|item| seen.insert(item.id))
                    .collect(),
            }
        }
    }
}
