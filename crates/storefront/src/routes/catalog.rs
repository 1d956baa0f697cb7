//! Server-side catalog listing.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use emporium_core::Category;
use emporium_core::Product;
use emporium_core::catalog::{
    CatalogQuery, FilterCriteria, PAGE_SIZE, SortOption, categories, parse_price_bound,
};

use super::products::load_products;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for `GET /api/catalog`.
///
/// Everything is optional and arrives as text; unusable values fall back to
/// their defaults except an unknown category, which is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl CatalogParams {
    /// Convert to a pipeline query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a category outside the fixed set.
    pub fn to_query(&self) -> Result<CatalogQuery> {
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(CatalogQuery {
            filter: FilterCriteria {
                search: self.q.clone().unwrap_or_default(),
                category,
                min_price: self.min_price.as_deref().and_then(parse_price_bound),
                max_price: self.max_price.as_deref().and_then(parse_price_bound),
            },
            sort: self.sort.as_deref().and_then(SortOption::parse),
            page: self
                .page
                .as_deref()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(1),
        })
    }
}

/// Response body of `GET /api/catalog`.
#[derive(Debug, Serialize)]
pub struct CatalogResponse<'a> {
    pub products: Vec<&'a Product>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// Categories present in the whole product list.
    pub categories: Vec<Category>,
}

/// `GET /api/catalog`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(params): Query<CatalogParams>) -> Result<Response> {
    let query = params.to_query()?;
    let products = load_products(&state).await?;

    let page = query.apply(&products, PAGE_SIZE);
    let body = CatalogResponse {
        products: page.products,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_count: page.total_count,
        categories: categories(&products),
    };
    Ok(Json(body).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_params_to_query() {
        let params = CatalogParams {
            q: Some("mouse".to_owned()),
            category: Some("Electronics".to_owned()),
            min_price: Some("$10".to_owned()),
            max_price: Some("abc".to_owned()),
            sort: Some("price-high-to-low".to_owned()),
            page: Some("2".to_owned()),
        };
        let query = params.to_query().unwrap();
        assert_eq!(query.filter.search, "mouse");
        assert_eq!(query.filter.category, Some(Category::Electronics));
        assert_eq!(query.filter.min_price, Some(Decimal::from(10)));
        assert_eq!(query.filter.max_price, None);
        assert_eq!(query.sort, Some(SortOption::PriceHighToLow));
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_defaults() {
        let query = CatalogParams::default().to_query().unwrap();
        assert_eq!(query, CatalogQuery { page: 1, ..CatalogQuery::default() });
    }

    #[test]
    fn test_bad_page_falls_back_to_first() {
        let params = CatalogParams {
            page: Some("-3".to_owned()),
            ..CatalogParams::default()
        };
        assert_eq!(params.to_query().unwrap().page, 1);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let params = CatalogParams {
            category: Some("Garden".to_owned()),
            ..CatalogParams::default()
        };
        assert!(matches!(params.to_query(), Err(AppError::BadRequest(_))));
    }
}
