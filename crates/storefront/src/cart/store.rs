//! Shared, observable handle over the cart state.

use std::sync::Arc;

use fakestore_core::{Product, ProductId};
use tokio::sync::watch;
use tracing::debug;

use super::state::{CartAction, CartLineItem, CartState, CheckoutPhase, reduce};

/// Handle to the shopping cart.
///
/// Cheap to clone; all clones share the same state. Every operation runs
/// [`reduce`] under the channel's lock, so subscribers never observe a
/// half-applied transition, and are woken only when the state changed.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<watch::Sender<CartState>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CartState::default());
        Self {
            inner: Arc::new(tx),
        }
    }

    /// Apply an action. Returns whether the state changed.
    pub fn dispatch(&self, action: CartAction) -> bool {
        let name = action.name();
        let changed = self.inner.send_if_modified(|state| {
            let next = reduce(state, action);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });
        debug!(action = name, changed, "Cart action");
        changed
    }

    /// Add one unit of `product`.
    pub fn add_item(&self, product: Product) {
        self.dispatch(CartAction::AddItem(product));
    }

    /// Remove the line for `id`, whatever its quantity.
    pub fn remove_item(&self, id: ProductId) {
        self.dispatch(CartAction::RemoveItem(id));
    }

    /// Add one to the quantity of `id`.
    pub fn increment_quantity(&self, id: ProductId) {
        self.dispatch(CartAction::IncrementQuantity(id));
    }

    /// Take one from the quantity of `id`, stopping at 1.
    pub fn decrement_quantity(&self, id: ProductId) {
        self.dispatch(CartAction::DecrementQuantity(id));
    }

    /// Empty the cart and leave the order-placed state.
    pub fn clear_cart(&self) {
        self.dispatch(CartAction::ClearCart);
    }

    /// Mark the order as placed. Does not clear the items.
    pub fn place_order(&self) {
        self.dispatch(CartAction::PlaceOrder);
    }

    /// Leave the order-placed state without touching the items.
    pub fn reset_order(&self) {
        self.dispatch(CartAction::ResetOrder);
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.inner.borrow().count()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.inner.borrow().clone()
    }

    /// Copy of the line item for `id`.
    #[must_use]
    pub fn line_item(&self, id: ProductId) -> Option<CartLineItem> {
        self.inner.borrow().line_item(id).cloned()
    }

    /// Current checkout phase.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.inner.borrow().phase()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Receiver that is notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fakestore_core::{Price, Rating};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents).unwrap(),
            description: String::new(),
            category: "test".to_string(),
            image: String::new(),
            rating: Rating::new(Decimal::ONE, 1),
        }
    }

    #[test]
    fn test_clones_share_state() {
        let cart = CartStore::new();
        let other = cart.clone();
        cart.add_item(product(1, 1000));
        assert_eq!(other.cart_count(), 1);
    }

    #[test]
    fn test_dispatch_reports_change() {
        let cart = CartStore::new();
        assert!(cart.dispatch(CartAction::AddItem(product(1, 100))));
        assert!(!cart.dispatch(CartAction::DecrementQuantity(ProductId::new(1))));
        assert!(!cart.dispatch(CartAction::RemoveItem(ProductId::new(2))));
    }

    #[test]
    fn test_checkout_flow() {
        let cart = CartStore::new();
        cart.add_item(product(1, 1000));
        cart.add_item(product(1, 1000));
        assert_eq!(cart.phase(), CheckoutPhase::Shopping);

        cart.place_order();
        assert_eq!(cart.phase(), CheckoutPhase::OrderPlaced);
        assert_eq!(cart.cart_count(), 2);

        cart.reset_order();
        assert_eq!(cart.phase(), CheckoutPhase::Shopping);
        assert_eq!(cart.line_item(ProductId::new(1)).unwrap().quantity, 2);

        cart.place_order();
        cart.clear_cart();
        assert!(cart.is_empty());
        assert_eq!(cart.phase(), CheckoutPhase::Shopping);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let cart = CartStore::new();
        let mut rx = cart.subscribe();

        cart.decrement_quantity(ProductId::new(1));
        assert!(!rx.has_changed().unwrap());

        cart.add_item(product(1, 500));
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.count(), 1);
        assert_eq!(seen.total, Price::from_cents(500).unwrap());
    }
}
