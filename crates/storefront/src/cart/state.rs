//! Cart state and its transition function.

use fakestore_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};

/// A product in the cart together with how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// The product, as it was when first added.
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1. Dropping to zero means removing the line.
    pub quantity: u32,
}

impl CartLineItem {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Product id of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.product.price
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Where the cart is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Shopping,
    OrderPlaced,
}

/// Everything the cart holds.
///
/// `total` is maintained incrementally by [`reduce`] and always equals the sum
/// of [`CartLineItem::line_total`] over `items`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartState {
    /// Line items in insertion order, at most one per product id.
    pub items: Vec<CartLineItem>,
    /// Running total.
    pub total: Price,
    /// Set by a completed checkout until the cart flow is re-entered.
    pub order_placed: bool,
}

impl CartState {
    /// Line item for `id`, if present.
    #[must_use]
    pub fn line_item(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current checkout phase.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        if self.order_placed {
            CheckoutPhase::OrderPlaced
        } else {
            CheckoutPhase::Shopping
        }
    }

    fn line_item_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}

/// Commands accepted by the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    AddItem(Product),
    RemoveItem(ProductId),
    IncrementQuantity(ProductId),
    DecrementQuantity(ProductId),
    ClearCart,
    PlaceOrder,
    ResetOrder,
}

impl CartAction {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "add_item",
            Self::RemoveItem(_) => "remove_item",
            Self::IncrementQuantity(_) => "increment_quantity",
            Self::DecrementQuantity(_) => "decrement_quantity",
            Self::ClearCart => "clear_cart",
            Self::PlaceOrder => "place_order",
            Self::ResetOrder => "reset_order",
        }
    }
}

/// Apply `action` to `state`, returning the next state.
///
/// Unknown product ids are no-ops, never errors. So is any change that would
/// overflow a quantity or the total. An existing line is always
/// priced at the price it was first added with, so the running total stays in
/// step with the line items even if the catalog price changes in between.
#[must_use]
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    let mut next = state.clone();

    match action {
        CartAction::AddItem(product) => {
            let total = next.total;
            if let Some(item) = next.line_item_mut(product.id) {
                let (Some(quantity), Some(total)) =
                    (item.quantity.checked_add(1), total.checked_add(item.price()))
                else {
                    return next;
                };
                item.quantity = quantity;
                next.total = total;
            } else if let Some(total) = total.checked_add(product.price) {
                next.total = total;
                next.items.push(CartLineItem::new(product));
            }
        }
        CartAction::RemoveItem(id) => {
            if let Some(pos) = next.items.iter().position(|item| item.id() == id) {
                let removed = next.items.remove(pos);
                next.total -= removed.line_total();
            }
        }
        CartAction::IncrementQuantity(id) => {
            let total = next.total;
            if let Some(item) = next.line_item_mut(id)
                && let Some(quantity) = item.quantity.checked_add(1)
                && let Some(total) = total.checked_add(item.price())
            {
                item.quantity = quantity;
                next.total = total;
            }
        }
        CartAction::DecrementQuantity(id) => {
            if let Some(item) = next.line_item_mut(id)
                && item.quantity > 1
            {
                item.quantity -= 1;
                let price = item.price();
                next.total -= price;
            }
        }
        CartAction::ClearCart => {
            next = CartState::default();
        }
        CartAction::PlaceOrder => {
            next.order_placed = true;
        }
        CartAction::ResetOrder => {
            next.order_placed = false;
        }
    }

    next
}
