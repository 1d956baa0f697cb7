//! Product repository for database operations.
//!
//! Identifiers are `UUID`s in the database and opaque strings everywhere
//! else. A string that is not a valid `UUID` cannot name a stored product, so
//! lookups with one report "not found" rather than an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;
use uuid::Uuid;

use emporium_core::{Category, NewProduct, Price, Product, ProductId, ProductUpdate};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, images, stock, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    images: Vec<String>,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;
        let category = row.category.parse::<Category>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category for product {}: {e}", row.id))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative stock for product {}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id.to_string()),
            name: row.name,
            description: row.description,
            price,
            category,
            images: row.images,
            stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Parse an opaque id into the database key. `None` means the id cannot
/// exist.
fn parse_id(id: &ProductId) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

fn stock_to_db(stock: u32) -> Result<i32, RepositoryError> {
    i32::try_from(stock).map_err(|_| RepositoryError::InvalidInput(format!("stock {stock} is too large")))
}

/// SQLSTATE `check_violation`.
const CHECK_VIOLATION: &str = "23514";
/// SQLSTATE `numeric_value_out_of_range`.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Whether a write failed because of the values given rather than the
/// database itself.
fn is_rejected_input(sqlstate: Option<&str>) -> bool {
    matches!(sqlstate, Some(CHECK_VIOLATION | NUMERIC_OUT_OF_RANGE))
}

fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && is_rejected_input(db_err.code().as_deref())
    {
        return RepositoryError::InvalidInput(db_err.message().to_owned());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product ORDER BY created_at, id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let Some(key) = parse_id(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Store a new product. The store assigns the id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidInput` if the store rejects a value.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn insert(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        insert_with(self.pool, product).await
    }

    /// Apply a partial update. Absent fields keep their stored values.
    ///
    /// Returns `None` if no product has this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidInput` if the store rejects a value.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, RepositoryError> {
        let Some(key) = parse_id(id) else {
            return Ok(None);
        };
        let stock = update.stock.map(stock_to_db).transpose()?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE storefront.product SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                images = COALESCE($6, images),
                stock = COALESCE($7, stock),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(key)
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.price.map(Price::amount))
        .bind(update.category.map(Category::as_str))
        .bind(update.images.as_deref())
        .bind(stock)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a product. Returns whether a product was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let Some(key) = parse_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM storefront.product WHERE id = $1")
            .bind(key)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the whole catalog in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidInput` if the store rejects a value.
    /// Returns `RepositoryError::Database` for other database errors. Nothing
    /// is changed on error.
    #[instrument(skip_all, fields(count = products.len()))]
    pub async fn replace_all(&self, products: &[NewProduct]) -> Result<Vec<Product>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM storefront.product")
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(products.len());
        for product in products {
            inserted.push(insert_with(&mut *tx, product).await?);
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

async fn insert_with<'e>(executor: impl PgExecutor<'e>, product: &NewProduct) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r"
        INSERT INTO storefront.product (name, description, price, category, images, stock)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {PRODUCT_COLUMNS}
        "
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.amount())
    .bind(product.category.as_str())
    .bind(&product.images)
    .bind(stock_to_db(product.stock)?)
    .fetch_one(executor)
    .await
    .map_err(map_write_error)?;

    row.try_into()
}
