//! Storefront HTTP client.

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use emporium_core::{Category, Product, ProductId};
use emporium_storefront::error::ErrorBody;

use crate::error::CliError;

/// Query for `GET /api/catalog`. Unset fields are left off the URL.
#[derive(Debug, Default, Serialize)]
pub struct CatalogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

/// One catalog page as served by the storefront.
#[derive(Debug, Deserialize)]
pub struct CatalogListing {
    pub products: Vec<Product>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub categories: Vec<Category>,
}

/// Client for the storefront JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch one product. `None` when the storefront does not know the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the storefront reports
    /// anything other than success or not-found.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Option<Product>, CliError> {
        let response = self
            .http
            .get(self.url(&format!("/api/products/{}", id.as_str())))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check(response).await?.json().await?))
    }

    /// Run the catalog pipeline on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the storefront rejects the
    /// query.
    #[instrument(skip(self))]
    pub async fn catalog(&self, request: &CatalogRequest) -> Result<CatalogListing, CliError> {
        let response = self
            .http
            .get(self.url("/api/catalog"))
            .query(request)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Turn a non-success response into `CliError::Api`, reading the error
/// envelope when there is one.
async fn check(response: Response) -> Result<Response, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_owned()
        });

    Err(CliError::Api {
        status: status.as_u16(),
        message,
    })
}
