//! FakeStore Core - Shared types library.
//!
//! This crate provides the catalog types used across all FakeStore components:
//! - `storefront` - Catalog client, cart and wishlist stores
//! - `cli` - Terminal front end over the stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, ratings and the product record itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
