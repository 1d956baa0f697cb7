//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (database)
//!
//! # Products
//! GET    /api/products         - Every product (JSON array)
//! POST   /api/products         - Create a product
//! GET    /api/products/{id}    - One product
//! PATCH  /api/products/{id}    - Partial update
//! DELETE /api/products/{id}    - Delete a product
//!
//! # Catalog
//! GET    /api/catalog          - Filtered, sorted, paginated listing
//! ```

pub mod catalog;
pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::index).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(product_routes())
        .route("/api/catalog", get(catalog::index))
}
