//! Integration tests for Emporium.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and start the storefront
//! cargo run -p emporium-cli -- migrate
//! cargo run -p emporium-storefront
//!
//! # Run integration tests
//! cargo test -p emporium-integration-tests -- --ignored
//! ```
//!
//! Tests create their own uniquely named products and delete them again, so
//! they can run against a seeded database.

use serde::Deserialize;
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// The `{error, timestamp}` envelope every failed request returns.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub timestamp: String,
}

/// Body for creating a product whose name is unique to this test run.
#[must_use]
pub fn new_product_body(prefix: &str, price: &str, category: &str) -> Value {
    json!({
        "name": format!("{prefix} {}", uuid::Uuid::new_v4()),
        "description": "Created by integration test",
        "price": price,
        "category": category,
        "images": ["test.jpg"],
        "stock": 3,
    })
}
