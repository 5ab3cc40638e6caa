//! Plain-text rendering of products, the cart and the wishlist.

use core::fmt::Write;

use fakestore_core::Product;
use fakestore_storefront::cart::CartState;
use fakestore_storefront::wishlist::WishlistState;

const TITLE_WIDTH: usize = 40;

/// Marker shown next to wishlisted products.
const WISHLISTED: &str = "♥";

/// One line of the product list.
pub fn product_row(product: &Product, wishlisted: bool) -> String {
    format!(
        "{:<5} {:<width$} {:>9}  {} {}",
        format!("#{}", product.id),
        truncate(&product.title, TITLE_WIDTH),
        product.price.to_string(),
        product.rating.render(),
        if wishlisted { WISHLISTED } else { "" },
        width = TITLE_WIDTH,
    )
    .trim_end()
    .to_string()
}

/// The product list, or a placeholder when the catalog is empty.
pub fn product_list(products: &[Product], wishlist: &WishlistState) -> String {
    if products.is_empty() {
        return "No products available".to_string();
    }
    products
        .iter()
        .map(|p| product_row(p, wishlist.contains(p.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The detail page of one product.
pub fn product_detail(product: &Product, wishlisted: bool, in_cart: Option<u32>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.title);
    let _ = writeln!(out, "{}  |  {}", product.price, product.category);
    let _ = writeln!(out, "{}", product.rating.render());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", product.description);
    let _ = writeln!(out);
    if let Some(quantity) = in_cart {
        let _ = writeln!(out, "In cart: {quantity}");
    }
    let _ = write!(
        out,
        "{}",
        if wishlisted {
            "♥ In your wishlist"
        } else {
            "♡ Not in your wishlist"
        }
    );
    out
}

/// Line items and the running total.
pub fn cart(state: &CartState) -> String {
    if state.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut out = String::new();
    for item in &state.items {
        let _ = writeln!(
            out,
            "{:<5} {:<width$} {:>3} x {:>9} = {:>9}",
            format!("#{}", item.id()),
            truncate(&item.product.title, TITLE_WIDTH),
            item.quantity,
            item.price().to_string(),
            item.line_total().to_string(),
            width = TITLE_WIDTH,
        );
    }
    let _ = write!(out, "Total: {} ({} items)", state.total, state.count());
    out
}

/// Confirmation shown once an order has been placed.
pub fn order_confirmation(state: &CartState) -> String {
    format!(
        "Order placed! {} items, {} total. Thank you for shopping with us.",
        state.count(),
        state.total
    )
}

/// Saved products.
pub fn wishlist(state: &WishlistState) -> String {
    if state.is_empty() {
        return "Your wishlist is empty".to_string();
    }
    state
        .items
        .iter()
        .map(|p| product_row(p, true))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Interactive prompt carrying the cart badge.
pub fn prompt(cart_count: u64) -> String {
    if cart_count == 0 {
        "fakestore> ".to_string()
    } else {
        format!("fakestore [cart: {cart_count}]> ")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fakestore_core::{Price, ProductId, Rating};
    use fakestore_storefront::cart::{CartAction, reduce};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents).unwrap(),
            description: "A thing".to_string(),
            category: "misc".to_string(),
            image: String::new(),
            rating: Rating::new(Decimal::new(35, 1), 12),
        }
    }

    #[test]
    fn test_product_row() {
        let row = product_row(&product(3, "Backpack", 10995), true);
        assert!(row.starts_with("#3"));
        assert!(row.contains("Backpack"));
        assert!(row.contains("$109.95"));
        assert!(row.contains("★★★⯪☆ (12)"));
        assert!(row.ends_with(WISHLISTED));
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let title = "x".repeat(100);
        let row = product_row(&product(1, &title, 100), false);
        assert!(row.contains('…'));
        assert!(!row.contains(&title));
    }

    #[test]
    fn test_empty_states() {
        assert_eq!(cart(&CartState::default()), "Your cart is empty");
        assert_eq!(wishlist(&WishlistState::default()), "Your wishlist is empty");
        assert_eq!(
            product_list(&[], &WishlistState::default()),
            "No products available"
        );
    }

    #[test]
    fn test_cart_total_line() {
        let state = reduce(
            &CartState::default(),
            CartAction::AddItem(product(1, "Shirt", 1000)),
        );
        let state = reduce(&state, CartAction::AddItem(product(1, "Shirt", 1000)));
        let text = cart(&state);
        assert!(text.contains("2 x    $10.00 =    $20.00"));
        assert!(text.ends_with("Total: $20.00 (2 items)"));
    }

    #[test]
    fn test_detail_shows_cart_quantity() {
        let p = product(2, "Ring", 500);
        assert!(product_detail(&p, false, Some(3)).contains("In cart: 3"));
        assert!(!product_detail(&p, true, None).contains("In cart"));
    }

    #[test]
    fn test_prompt_badge() {
        assert_eq!(prompt(0), "fakestore> ");
        assert_eq!(prompt(4), "fakestore [cart: 4]> ");
    }
}
