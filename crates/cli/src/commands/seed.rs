//! Seed the product table.
//!
//! Without a file, the table is filled with six sample electronics. A seed
//! file is YAML with a top-level `products` list:
//!
//! ```yaml
//! products:
//!   - name: Wireless Mouse
//!     description: Ergonomic wireless mouse with RGB lighting
//!     price: "49.99"
//!     category: Electronics
//!     images: ["/products/mouse.jpg"]
//!     stock: 100
//! ```
//!
//! Existing products are deleted first; the whole replacement runs in one
//! transaction.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use emporium_core::{Category, NewProduct, Price};
use emporium_storefront::config::StorefrontConfig;
use emporium_storefront::db::Database;
use emporium_storefront::db::products::ProductRepository;

use crate::error::CliError;

/// Shape of a seed file.
#[derive(Debug, Deserialize)]
struct SeedFile {
    products: Vec<NewProduct>,
}

fn sample(name: &str, description: &str, cents: i64, image: &str, stock: u32) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: description.to_owned(),
        price: Price::new(Decimal::new(cents, 2)).unwrap_or(Price::ZERO),
        category: Category::Electronics,
        images: vec![format!("/products/{image}")],
        stock,
    }
}

/// The built-in sample catalog.
#[must_use]
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        sample(
            "Wireless Bluetooth Headphones",
            "Premium wireless headphones with active noise cancellation",
            19_999,
            "headphones.jpg",
            50,
        ),
        sample(
            "Smartwatch",
            "Feature-rich smartwatch with fitness tracking and notifications",
            29_999,
            "smartwatch.jpg",
            30,
        ),
        sample(
            "Gaming Laptop",
            "High-performance gaming laptop with NVIDIA RTX 3060",
            149_999,
            "laptop.jpg",
            15,
        ),
        sample(
            "Smartphone",
            "Latest flagship smartphone with 5G and triple camera",
            99_999,
            "smartphone.jpg",
            25,
        ),
        sample(
            "Wireless Mouse",
            "Ergonomic wireless mouse with RGB lighting",
            4_999,
            "mouse.jpg",
            100,
        ),
        sample(
            "Gaming Keyboard",
            "Mechanical gaming keyboard with RGB backlighting",
            12_999,
            "keyboard.jpg",
            40,
        ),
    ]
}

/// Parse and check a seed file's contents.
///
/// # Errors
///
/// Returns `CliError::Yaml` for malformed YAML and `CliError::InvalidInput`
/// when a product has no name.
pub fn parse_seed_file(content: &str) -> Result<Vec<NewProduct>, CliError> {
    let file: SeedFile = serde_yaml::from_str(content)?;

    let errors: Vec<String> = file
        .products
        .iter()
        .enumerate()
        .filter(|(_, p)| p.name.trim().is_empty())
        .map(|(i, _)| format!("product #{} has no name", i + 1))
        .collect();
    if !errors.is_empty() {
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CliError::InvalidInput(format!(
            "{} validation errors found",
            errors.len()
        )));
    }

    Ok(file.products)
}

/// Replace every product with the samples or the contents of `file_path`.
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read or
/// parsed, or the database rejects the products.
pub async fn products(file_path: Option<&Path>) -> Result<(), CliError> {
    let products = match file_path {
        Some(path) => {
            info!(path = %path.display(), "Loading products from file");
            let content = tokio::fs::read_to_string(path).await?;
            parse_seed_file(&content)?
        }
        None => sample_products(),
    };
    info!(count = products.len(), "Parsed products");

    let config = StorefrontConfig::from_env()?;
    info!("Connecting to database...");
    let database = Database::connect(&config.database_url, config.database).await?;

    info!("Clearing existing products and inserting seed data...");
    let result = ProductRepository::new(database.pool())
        .replace_all(&products)
        .await;
    database.close().await;
    let inserted = result?;

    info!("Seeding complete!");
    for product in &inserted {
        info!("  {} ({}) {}", product.name, product.id, product.price.display());
    }
    Ok(())
}
