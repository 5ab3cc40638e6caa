//! Catalog product record.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, Rating};

/// A product as served by the remote catalog.
///
/// Read-only from the storefront's point of view. Field names and JSON shape
/// match the catalog's `GET /products` payload so the same type is used for
/// decoding responses and for the wishlist's local storage mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier, unique across products.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Long-form description.
    pub description: String,
    /// Category name (e.g. "electronics").
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Customer rating.
    pub rating: Rating,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const CATALOG_JSON: &str = r#"{
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        "price": 109.95,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
    }"#;

    #[test]
    fn test_deserialize_catalog_product() {
        let product: Product = serde_json::from_str(CATALOG_JSON).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995).unwrap());
        assert_eq!(product.category, "men's clothing");
        assert_eq!(product.rating.rate, Decimal::new(39, 1));
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn test_serialized_shape_matches_catalog() {
        let product: Product = serde_json::from_str(CATALOG_JSON).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], serde_json::json!(1));
        assert_eq!(value["price"], serde_json::json!(109.95));
        assert_eq!(value["rating"]["rate"], serde_json::json!(3.9));

        let reparsed: Product = serde_json::from_value(value).unwrap();
        assert_eq!(reparsed, product);
    }

    #[test]
    fn test_missing_field_fails() {
        let json = r#"{"id": 1, "title": "No price"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
