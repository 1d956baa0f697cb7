//! Integration tests for the product and catalog API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`emp migrate`)
//! - The storefront server running (cargo run -p emporium-storefront)

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use emporium_core::Product;
use emporium_integration_tests::{ErrorEnvelope, new_product_body, storefront_base_url};

async fn create_product(client: &Client, body: &Value) -> Product {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(body)
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to decode created product")
}

async fn delete_product(client: &Client, product: &Product) {
    let base_url = storefront_base_url();
    let _ = client
        .delete(format!("{base_url}/api/products/{}", product.id))
        .send()
        .await;
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_health_and_readiness() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to call /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_request_id_is_echoed() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .header("x-request-id", "integration-test-42")
        .send()
        .await
        .expect("Failed to call /health");

    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("integration-test-42")
    );
}

// ============================================================================
// Product CRUD
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_product_lifecycle() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let created = create_product(&client, &new_product_body("Lifecycle", "19.99", "Accessories")).await;
    assert_eq!(created.stock, 3);

    // Listed
    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = resp.json().await.expect("Failed to decode product list");
    assert!(products.iter().any(|p| p.id == created.id));

    // Partial update leaves the other fields alone
    let resp = client
        .patch(format!("{base_url}/api/products/{}", created.id))
        .json(&json!({ "stock": 7 }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Product = resp.json().await.expect("Failed to decode updated product");
    assert_eq!(updated.stock, 7);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.price, created.price);

    // Fetched
    let resp = client
        .get(format!("{base_url}/api/products/{}", created.id))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Product = resp.json().await.expect("Failed to decode product");
    assert_eq!(fetched.stock, 7);

    // Deleted, then gone
    let resp = client
        .delete(format!("{base_url}/api/products/{}", created.id))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/products/{}", created.id))
        .send()
        .await
        .expect("Failed to fetch deleted product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_malformed_id_is_not_found() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/products/not-a-valid-id"))
        .send()
        .await
        .expect("Failed to fetch product");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorEnvelope = resp.json().await.expect("Failed to decode error envelope");
    assert_eq!(body.error, "Product not found");
    assert!(!body.timestamp.is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_create_rejects_negative_price() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&new_product_body("Negative", "-5.00", "Mobile"))
        .send()
        .await
        .expect("Failed to call create");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_catalog_search_and_sort() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let cheap = create_product(&client, &new_product_body("Zebra Widget", "5.00", "Computers")).await;
    let pricey = create_product(&client, &new_product_body("Zebra Widget", "500.00", "Computers")).await;

    let resp = client
        .get(format!(
            "{base_url}/api/catalog?q=zebra%20widget&category=Computers&sort=price-high-to-low"
        ))
        .send()
        .await
        .expect("Failed to query catalog");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to decode catalog");

    let ids: Vec<&str> = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .filter_map(|p| p["_id"].as_str())
        .collect();
    let pricey_at = ids.iter().position(|id| *id == pricey.id.as_str());
    let cheap_at = ids.iter().position(|id| *id == cheap.id.as_str());
    assert!(pricey_at.is_some() && cheap_at.is_some());
    assert!(pricey_at < cheap_at);
    assert_eq!(body["current_page"], 1);

    delete_product(&client, &cheap).await;
    delete_product(&client, &pricey).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_catalog_page_clamps() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/catalog?page=9999"))
        .send()
        .await
        .expect("Failed to query catalog");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to decode catalog");

    let total_pages = body["total_pages"].as_u64().expect("total_pages");
    assert_eq!(body["current_page"].as_u64(), Some(total_pages.max(1)));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_catalog_unknown_category_is_bad_request() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/catalog?category=Garden"))
        .send()
        .await
        .expect("Failed to query catalog");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
