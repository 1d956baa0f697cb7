//! Catalog view pipeline.
//!
//! The product listing is derived from the full product list in five
//! stages:
//!
//! ```text
//! products -> search -> category -> price range -> sort -> paginate
//! ```
//!
//! The stage functions in this module are pure and work on indices into the
//! product slice. [`CatalogQuery`] runs them once for a stateless request;
//! [`CatalogView`] keeps them in cached nodes for an interactive session so
//! that, for example, turning the page never re-runs the search filter.

mod debounce;
mod memo;
mod view;

use std::cmp::Ordering;
use std::ops::Range;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::Category;

pub use debounce::{Debounced, SEARCH_DEBOUNCE};
pub use memo::Memo;
pub use view::CatalogView;

/// Products per listing page.
pub const PAGE_SIZE: usize = 12;

/// Listing sort order. No sort keeps filter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    PriceLowToHigh,
    PriceHighToLow,
    Newest,
}

impl SortOption {
    /// Parse from URL parameter value.
    ///
    /// Unknown values mean "no sort".
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price-low-to-high" | "price_asc" => Some(Self::PriceLowToHigh),
            "price-high-to-low" | "price_desc" => Some(Self::PriceHighToLow),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceLowToHigh => "price-low-to-high",
            Self::PriceHighToLow => "price-high-to-low",
            Self::Newest => "newest",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceLowToHigh => a.price.cmp(&b.price),
            Self::PriceHighToLow => b.price.cmp(&a.price),
            Self::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

/// Parse a typed price bound.
///
/// Everything except ASCII digits and `.` is stripped first, so `"$1,299"`
/// reads as `1299`. The longest leading number is then taken, so `"1.2.3"`
/// reads as `1.2`. Text with no leading digit means "no bound".
#[must_use]
pub fn parse_price_bound(text: &str) -> Option<Decimal> {
    let sanitized: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let int_len = sanitized.chars().take_while(char::is_ascii_digit).count();
    let rest = sanitized.get(int_len..).unwrap_or_default();
    let frac_len = rest
        .strip_prefix('.')
        .map_or(0, |frac| frac.chars().take_while(char::is_ascii_digit).count());
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    let int_part = sanitized.get(..int_len).filter(|s| !s.is_empty()).unwrap_or("0");
    let number = if frac_len == 0 {
        int_part.to_owned()
    } else {
        format!("{int_part}.{}", rest.get(1..=frac_len).unwrap_or_default())
    };
    number.parse().ok()
}

/// Inputs of the filter stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Search term, matched case-insensitively against name and description.
    pub search: String,
    pub category: Option<Category>,
    /// Inclusive lower bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound.
    pub max_price: Option<Decimal>,
}

impl FilterCriteria {
    fn matches(&self, product: &Product, needle_lower: &str) -> bool {
        let price = product.price.amount();
        product.matches_search(needle_lower)
            && self.category.is_none_or(|category| product.category == category)
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}

/// Search, category and price-range stages. Returns indices into
/// `products`, in their original order.
#[must_use]
pub fn filter_indices(products: &[Product], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.search.to_lowercase();
    products
        .iter()
        .enumerate()
        .filter(|(_, product)| criteria.matches(product, &needle))
        .map(|(index, _)| index)
        .collect()
}

/// Sort stage. Stable, so equal keys keep filter order.
#[must_use]
pub fn sort_indices(products: &[Product], indices: &[usize], sort: Option<SortOption>) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    if let Some(sort) = sort {
        sorted.sort_by(|&a, &b| match (products.get(a), products.get(b)) {
            (Some(a), Some(b)) => sort.compare(a, b),
            _ => Ordering::Equal,
        });
    }
    sorted
}

/// Where a page falls within a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page actually shown, after clamping.
    pub current_page: usize,
    /// `ceil(total / page_size)`; zero for an empty listing.
    pub total_pages: usize,
    /// Slice of the listing on this page.
    pub range: Range<usize>,
}

/// Pagination stage.
///
/// The requested page is clamped to `[1, total_pages]` (page 1 when the
/// listing is empty).
#[must_use]
pub fn page_window(total: usize, requested_page: usize, page_size: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let total_pages = total.div_ceil(page_size);
    let current_page = requested_page.clamp(1, total_pages.max(1));
    let start = ((current_page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);
    PageWindow {
        current_page,
        total_pages,
        range: start..end,
    }
}

/// Distinct categories present in `products`, in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<Category> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category);
        }
    }
    seen
}

/// One page of a derived listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage<'a> {
    pub products: Vec<&'a Product>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Products matching the filters, across all pages.
    pub total_count: usize,
}

impl CatalogPage<'_> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    fn assemble<'a>(products: &'a [Product], ordered: &[usize], window: PageWindow) -> CatalogPage<'a> {
        CatalogPage {
            products: ordered
                .get(window.range)
                .unwrap_or_default()
                .iter()
                .filter_map(|&index| products.get(index))
                .collect(),
            current_page: window.current_page,
            total_pages: window.total_pages,
            total_count: ordered.len(),
        }
    }
}

/// A one-shot listing request, e.g. from URL query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub filter: FilterCriteria,
    pub sort: Option<SortOption>,
    /// 1-based; clamped when applied.
    pub page: usize,
}

impl CatalogQuery {
    /// Run every stage over `products`.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product], page_size: usize) -> CatalogPage<'a> {
        let filtered = filter_indices(products, &self.filter);
        let ordered = sort_indices(products, &filtered, self.sort);
        let window = page_window(ordered.len(), self.page, page_size);
        CatalogPage::assemble(products, &ordered, window)
    }
}
