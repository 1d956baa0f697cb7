//! Database operations for the storefront `PostgreSQL` product store.
//!
//! ## Tables
//!
//! - `storefront.product` - The product catalog
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate
//! ```

pub mod products;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{info, instrument};

pub use products::ProductRepository;

use crate::config::PoolConfig;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Input the store refuses (e.g. an out-of-range value).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// The storefront's connection pool.
///
/// Created once at startup and handed to each repository by reference. The
/// pool is closed explicitly during graceful shutdown.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect, failing if no connection can be established within the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection cannot be established.
    #[instrument(skip_all, fields(max_connections = config.max_connections))]
    pub async fn connect(database_url: &secrecy::SecretString, config: PoolConfig) -> Result<Self, sqlx::Error> {
        let pool = pool_options(config)
            .connect(database_url.expose_secret())
            .await?;
        info!("Database pool created");
        Ok(Self { pool })
    }

    /// Create the pool without connecting. Connections are opened on first
    /// use, so a bad URL or unreachable server surfaces per query.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection URL cannot be parsed.
    pub fn connect_lazy(database_url: &secrecy::SecretString, config: PoolConfig) -> Result<Self, sqlx::Error> {
        let pool = pool_options(config).connect_lazy(database_url.expose_secret())?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip `SELECT 1`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database is unreachable.
    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every connection and stop handing out new ones.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn pool_options(config: PoolConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
}
