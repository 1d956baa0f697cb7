//! CLI error type.

use emporium_core::cart::CartError;
use emporium_core::checkout::CheckoutError;
use emporium_core::storage::StorageError;
use emporium_storefront::config::ConfigError;
use emporium_storefront::db::RepositoryError;
use thiserror::Error;

/// Errors surfaced by `emp` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront answered with an error envelope.
    #[error("storefront returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
