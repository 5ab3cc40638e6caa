//! Core types for FakeStore.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod rating;

pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
pub use product::Product;
pub use rating::{Rating, Star};
