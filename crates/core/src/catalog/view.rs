//! Interactive catalog session.

use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use super::{
    CatalogPage, Debounced, FilterCriteria, Memo, PAGE_SIZE, SEARCH_DEBOUNCE, SortOption, categories,
    filter_indices, page_window, parse_price_bound, sort_indices,
};
use crate::product::Product;
use crate::types::Category;

/// Catalog state for one shopper, with each pipeline stage cached.
///
/// The filter node is keyed on the product revision, settled search term,
/// category and price bounds. The sort node is keyed on the filter node's
/// revision and the sort option. Pagination is a slice over the sort output,
/// so turning the page recomputes nothing upstream.
#[derive(Debug)]
pub struct CatalogView {
    products: Vec<Product>,
    products_revision: u64,
    search: Debounced<String>,
    category: Option<Category>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    sort: Option<SortOption>,
    page: usize,
    page_size: usize,
    filtered: Memo<(u64, FilterCriteria), Vec<usize>>,
    sorted: Memo<(u64, Option<SortOption>), Vec<usize>>,
    facets: Memo<u64, Vec<Category>>,
}

impl CatalogView {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self::with_settings(products, PAGE_SIZE, SEARCH_DEBOUNCE)
    }

    #[must_use]
    pub fn with_settings(products: Vec<Product>, page_size: usize, debounce: Duration) -> Self {
        Self {
            products,
            products_revision: 0,
            search: Debounced::new(String::new(), debounce),
            category: None,
            min_price: None,
            max_price: None,
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            filtered: Memo::new(),
            sorted: Memo::new(),
            facets: Memo::new(),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Replace the product list, e.g. after a refetch.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.products_revision += 1;
    }

    /// Record a keystroke in the search box. The term applies once input has
    /// been quiet for the debounce delay.
    pub fn set_search(&mut self, term: impl Into<String>, now: Instant) {
        self.search.set(term.into(), now);
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.page = 1;
    }

    /// Set the price bounds from typed text. See [`parse_price_bound`].
    pub fn set_price_range(&mut self, min: &str, max: &str) {
        self.min_price = parse_price_bound(min);
        self.max_price = parse_price_bound(max);
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortOption>) {
        self.sort = sort;
    }

    /// Request a 1-based page. Out-of-range pages are clamped on render.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Reset search, category, price range and sort.
    pub fn clear_filters(&mut self) {
        self.search.set_now(String::new());
        self.category = None;
        self.min_price = None;
        self.max_price = None;
        self.sort = None;
        self.page = 1;
    }

    /// The search term currently applied to the listing.
    #[must_use]
    pub fn applied_search(&self) -> &str {
        self.search.settled()
    }

    /// Whether typed search input is still waiting out the debounce delay.
    #[must_use]
    pub const fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Distinct categories in the product list, in first-seen order.
    pub fn categories(&mut self) -> &[Category] {
        let products = &self.products;
        self.facets
            .get_or_compute(self.products_revision, || categories(products))
    }

    /// Run the pipeline as of `now` and return the current page.
    pub fn render(&mut self, now: Instant) -> CatalogPage<'_> {
        let criteria = FilterCriteria {
            search: self.search.poll(now).clone(),
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
        };
        let products = &self.products;

        self.filtered
            .get_or_compute((self.products_revision, criteria.clone()), || {
                filter_indices(products, &criteria)
            });
        let filtered = self.filtered.value().map_or(&[][..], Vec::as_slice);

        let sort = self.sort;
        let ordered = self
            .sorted
            .get_or_compute((self.filtered.revision(), sort), || {
                sort_indices(products, filtered, sort)
            });

        let window = page_window(ordered.len(), self.page, self.page_size);
        self.page = window.current_page;
        CatalogPage::assemble(products, ordered, window)
    }

    /// How many times the filter and sort stages have run.
    #[must_use]
    pub const fn stage_revisions(&self) -> (u64, u64) {
        (self.filtered.revision(), self.sorted.revision())
    }
}
