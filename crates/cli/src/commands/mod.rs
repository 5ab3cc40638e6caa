//! Command implementations.

pub mod products;
pub mod shop;
pub mod wishlist;
