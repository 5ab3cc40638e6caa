//! FakeStore storefront library.
//!
//! Everything a storefront front end needs below the view layer: the remote
//! catalog client, the cart, the persistent wishlist, and the shared
//! [`state::AppState`] that wires them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod wishlist;
