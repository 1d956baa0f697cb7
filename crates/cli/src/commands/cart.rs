//! Client-side cart commands.
//!
//! The cart lives in the data directory, not on the server. Adding a product
//! fetches its current snapshot from the storefront; every other command works
//! offline.

use std::path::Path;

use tracing::info;

use emporium_core::cart::{CartStore, ensure_in_stock};
use emporium_core::{ProductId, format_amount};

use crate::client::ApiClient;
use crate::error::CliError;
use crate::storage::FileStorage;

/// Open the persisted cart and log every change made to it.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn open(data_dir: &Path) -> Result<CartStore<FileStorage>, CliError> {
    let mut store = CartStore::open(FileStorage::open(data_dir)?);
    store.subscribe(|event| {
        info!(
            change = ?event.change,
            total_items = event.cart.total_items(),
            "Cart updated"
        );
    });
    Ok(store)
}

/// Print the cart lines and totals.
pub fn print(store: &CartStore<FileStorage>) {
    #[allow(clippy::print_stdout)]
    {
        if store.items().is_empty() {
            println!("Your cart is empty");
            return;
        }
        for item in store.items() {
            println!(
                "{:<36}  {:<32} {:>4} x {:>10} = {:>10}",
                item.product.id,
                item.product.name,
                item.quantity,
                item.product.price.display(),
                format_amount(item.line_total())
            );
        }
        println!(
            "{} items, total {}",
            store.total_items(),
            format_amount(store.total_price())
        );
    }
}

/// Add `quantity` units of a product.
///
/// # Errors
///
/// Returns `CliError::NotFound` for an unknown product and
/// `CliError::Cart` when it is out of stock or the cart cannot be saved.
pub async fn add(client: &ApiClient, data_dir: &Path, id: &ProductId, quantity: u32) -> Result<(), CliError> {
    let product = client
        .product(id)
        .await?
        .ok_or_else(|| CliError::NotFound("Product not found".to_owned()))?;
    ensure_in_stock(&product)?;

    let mut store = open(data_dir)?;
    store.add_to_cart(&product, quantity)?;
    print(&store);
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(data_dir: &Path, id: &ProductId) -> Result<(), CliError> {
    let mut store = open(data_dir)?;
    store.remove_from_cart(id)?;
    print(&store);
    Ok(())
}

/// Set a product's quantity. Negative values are stored as zero and the line
/// is kept.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn update(data_dir: &Path, id: &ProductId, quantity: i64) -> Result<(), CliError> {
    let mut store = open(data_dir)?;
    store.update_quantity(id, quantity)?;
    print(&store);
    Ok(())
}

/// Drop zero-quantity lines.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn prune(data_dir: &Path) -> Result<(), CliError> {
    let mut store = open(data_dir)?;
    store.prune_empty()?;
    print(&store);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(data_dir: &Path) -> Result<(), CliError> {
    let mut store = open(data_dir)?;
    store.clear()?;
    print(&store);
    Ok(())
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn show(data_dir: &Path) -> Result<(), CliError> {
    print(&open(data_dir)?);
    Ok(())
}
