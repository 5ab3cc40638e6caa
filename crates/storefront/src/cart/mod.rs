//! Shopping cart.
//!
//! The cart is a single [`CartState`] value moved forward by one pure
//! function, [`reduce`], in response to [`CartAction`] commands.
//! [`CartStore`] owns the current value and notifies subscribers.
//!
//! # Checkout flow
//!
//! ```text
//! Shopping --place_order--> OrderPlaced --reset_order--> Shopping
//!     ^                                                    |
//!     +----------------- clear_cart (from anywhere) -------+
//! ```
//!
//! Placing an order does not clear the cart. Callers that want both call
//! `place_order` and then `clear_cart`.
//!
//! The cart lives in memory only and starts empty on every launch.

mod state;
mod store;

pub use state::{CartAction, CartLineItem, CartState, CheckoutPhase, reduce};
pub use store::CartStore;
