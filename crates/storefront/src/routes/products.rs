//! Product route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use emporium_core::{NewProduct, Product, ProductId, ProductUpdate};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Load the full product list, from cache when fresh.
///
/// # Errors
///
/// Returns `AppError::Failed` if the product store cannot be read.
pub async fn load_products(state: &AppState) -> Result<Arc<[Product]>> {
    if let Some(products) = state.cache().products().await {
        return Ok(products);
    }

    let products: Arc<[Product]> = state
        .products()
        .list()
        .await
        .map_err(|source| AppError::Failed {
            message: "Failed to fetch products",
            source,
        })?
        .into();
    state.cache().insert_products(Arc::clone(&products)).await;
    Ok(products)
}

/// `GET /api/products` - every product as a JSON array.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let products = load_products(&state).await?;
    Ok(Json(&*products).into_response())
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    if let Some(product) = state.cache().product(&id).await {
        return Ok(Json(product));
    }

    let product = state
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    state.cache().insert_product(&product).await;
    Ok(Json(product))
}

/// `POST /api/products`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(product) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if product.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }

    let product = state.products().insert(&product).await?;
    state.cache().invalidate_all().await;
    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PATCH /api/products/{id}`
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(update) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }

    let id = ProductId::new(id);
    let product = state
        .products()
        .update(&id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    state.cache().invalidate_all().await;
    info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let id = ProductId::new(id);
    if !state.products().delete(&id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    state.cache().invalidate_all().await;
    info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
