//! Wishlist.
//!
//! Same shape as the cart: a [`WishlistState`] value, a pure [`reduce`]
//! function over [`WishlistAction`]s, and a [`WishlistStore`] handle. Unlike
//! the cart, the wishlist is mirrored to local storage under
//! [`WISHLIST_STORAGE_KEY`] and reloaded on the next launch.
//!
//! The store announces changes as [`WishlistEvent`]s. It knows nothing about
//! who listens; the application wires the catalog cache to these events so
//! product views are re-fetched after the wishlist changes.

mod state;
mod store;

pub use state::{WishlistAction, WishlistState, reduce};
pub use store::{WISHLIST_STORAGE_KEY, WishlistEvent, WishlistStore};
