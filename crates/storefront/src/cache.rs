//! In-memory cache for product reads.
//!
//! Reads go through the cache; every successful write drops all entries, so
//! a stale read is bounded by the configured TTL only for writes made by
//! another process.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use emporium_core::{Product, ProductId};

/// Cache key for products.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<[Product]>),
    Product(Box<Product>),
}

/// Product read cache.
#[derive(Clone)]
pub struct ProductCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ProductCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl ProductCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1000).time_to_live(ttl).build();
        Self { cache }
    }

    /// The cached product list, if fresh.
    pub async fn products(&self) -> Option<Arc<[Product]>> {
        match self.cache.get(&CacheKey::Products).await {
            Some(CacheValue::Products(products)) => {
                debug!("Cache hit for product list");
                Some(products)
            }
            _ => None,
        }
    }

    pub async fn insert_products(&self, products: Arc<[Product]>) {
        self.cache
            .insert(CacheKey::Products, CacheValue::Products(products))
            .await;
    }

    /// A cached product, if fresh.
    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        match self.cache.get(&CacheKey::Product(id.clone())).await {
            Some(CacheValue::Product(product)) => {
                debug!(product_id = %id, "Cache hit for product");
                Some(*product)
            }
            _ => None,
        }
    }

    pub async fn insert_product(&self, product: &Product) {
        self.cache
            .insert(
                CacheKey::Product(product.id.clone()),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;
    }

    /// Drop every entry.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
