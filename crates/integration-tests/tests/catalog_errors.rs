//! Integration tests for catalog failure handling.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use fakestore_core::ProductId;
use fakestore_integration_tests::{FakeCatalog, Mode};
use fakestore_storefront::catalog::{CatalogClient, CatalogError, QueryKey, QueryState};
use fakestore_storefront::config::CatalogConfig;
use fakestore_storefront::error::AppError;

fn client(catalog: &FakeCatalog) -> CatalogClient {
    CatalogClient::new(&catalog.catalog_config(Duration::from_secs(60))).unwrap()
}

#[tokio::test]
async fn test_server_error_is_a_network_error() {
    let catalog = FakeCatalog::start_with_samples().await;
    catalog.set_mode(Mode::Failing(StatusCode::INTERNAL_SERVER_ERROR));
    let client = client(&catalog);

    let err = client.fetch_product_list().await.unwrap_err();

    assert!(err.is_network());
    match err {
        CatalogError::Status { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "catalog unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let catalog = FakeCatalog::start_with_samples().await;
    catalog.set_mode(Mode::Failing(StatusCode::SERVICE_UNAVAILABLE));
    let client = client(&catalog);

    assert!(client.fetch_product_list().await.is_err());
    assert!(!client.is_cached(QueryKey::Products).await);

    catalog.set_mode(Mode::Healthy);
    assert_eq!(client.fetch_product_list().await.unwrap().len(), 3);
    assert_eq!(catalog.list_requests(), 2);
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let catalog = FakeCatalog::start_with_samples().await;
    catalog.set_mode(Mode::Malformed);
    let client = client(&catalog);

    let list = client.fetch_product_list().await.unwrap_err();
    assert!(matches!(list, CatalogError::Decode(_)));
    assert!(!list.is_network());

    let detail = client.fetch_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(detail, CatalogError::Decode(_)));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let catalog = FakeCatalog::start_with_samples().await;
    let client = client(&catalog);

    let err = client.fetch_product(ProductId::new(404)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let state = client.query_product(Some(ProductId::new(404))).await;
    assert_eq!(state, QueryState::Error("Product not found".to_string()));
}

#[tokio::test]
async fn test_unreachable_catalog_is_a_network_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = CatalogConfig {
        request_timeout: Duration::from_secs(2),
        ..CatalogConfig::with_base_url(&format!("http://{addr}")).unwrap()
    };
    let client = CatalogClient::new(&config).unwrap();

    let err = client.fetch_product_list().await.unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)));

    let app_error = AppError::from(err);
    assert_eq!(app_error.user_message(), "Failed to fetch products");
    assert!(app_error.is_reportable());
}

#[tokio::test]
async fn test_query_state_hides_details() {
    let catalog = FakeCatalog::start_with_samples().await;
    catalog.set_mode(Mode::Failing(StatusCode::BAD_GATEWAY));
    let client = client(&catalog);

    let state = client.query_products().await;
    assert_eq!(state.error(), Some("Failed to fetch products"));
    assert!(state.data().is_none());
}
