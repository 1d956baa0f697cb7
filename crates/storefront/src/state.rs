//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::ProductCache;
use crate::config::StorefrontConfig;
use crate::db::{Database, ProductRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    database: Database,
    cache: ProductCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, database: Database) -> Self {
        let cache = ProductCache::new(config.cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                database,
                cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        self.inner.database.pool()
    }

    /// A product repository over the shared pool.
    #[must_use]
    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(self.pool())
    }

    #[must_use]
    pub fn cache(&self) -> &ProductCache {
        &self.inner.cache
    }
}
