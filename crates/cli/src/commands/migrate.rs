//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! emp migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded at
//! compile time.

use tracing::info;

use emporium_storefront::config::StorefrontConfig;
use emporium_storefront::db::Database;

use crate::error::CliError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable
/// or a migration fails.
pub async fn storefront() -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;

    info!("Connecting to storefront database...");
    let database = Database::connect(&config.database_url, config.database).await?;

    info!("Running storefront migrations...");
    let result = sqlx::migrate!("../storefront/migrations")
        .run(database.pool())
        .await;
    database.close().await;
    result?;

    info!("Storefront migrations complete!");
    Ok(())
}
