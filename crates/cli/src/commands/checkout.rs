//! Place an order from the persisted cart.

use std::path::PathBuf;
use std::time::Duration;

use emporium_core::checkout::{Checkout, CheckoutError, DelayedProcessor, OrderReceipt, ShippingInfo};

use super::{cart, order};
use crate::error::CliError;

/// Validate the shipping details, place the order and print the receipt.
///
/// Order processing blocks for `delay`, so it runs on the blocking pool.
///
/// # Errors
///
/// Returns `CliError::Checkout` when a field is invalid (each message is
/// logged), the cart is empty, or the receipt cannot be stored.
pub async fn place_order(data_dir: PathBuf, info: ShippingInfo, delay: Duration) -> Result<(), CliError> {
    let receipt = tokio::task::spawn_blocking(move || submit(&data_dir, info, delay)).await??;
    order::print(&receipt);
    Ok(())
}

fn submit(data_dir: &std::path::Path, info: ShippingInfo, delay: Duration) -> Result<OrderReceipt, CliError> {
    let mut store = cart::open(data_dir)?;
    let mut checkout = Checkout::new(DelayedProcessor { delay });
    checkout.set_info(info);

    match checkout.submit(&mut store) {
        Ok(receipt) => Ok(receipt.clone()),
        Err(CheckoutError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                tracing::error!(field = %field, "{message}");
            }
            Err(CheckoutError::Validation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use emporium_core::storage::{CART_KEY, Storage};
    use emporium_core::{Category, Price, Product, ProductId};

    use super::*;
    use crate::storage::FileStorage;

    fn info() -> ShippingInfo {
        ShippingInfo {
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "+44 20 7946 0000".to_owned(),
            address: "12 Analytical Row".to_owned(),
            city: "London".to_owned(),
            postal_code: "N1 9GU".to_owned(),
            country: "UK".to_owned(),
        }
    }

    fn product() -> Product {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Product {
            id: ProductId::new("p1"),
            name: "Wireless Mouse".to_owned(),
            description: String::new(),
            price: Price::from_cents(4_999).unwrap(),
            category: Category::Electronics,
            images: Vec::new(),
            stock: 100,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_submit_clears_cart_and_stores_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = cart::open(dir.path()).unwrap();
        store.add_to_cart(&product(), 2).unwrap();
        drop(store);

        let receipt = submit(dir.path(), info(), Duration::ZERO).unwrap();
        assert_eq!(receipt.total, "99.98".parse().unwrap());

        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(OrderReceipt::load_last(&storage).unwrap(), Some(receipt));
        assert_eq!(cart::open(dir.path()).unwrap().total_items(), 0);
    }

    #[test]
    fn test_invalid_email_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = cart::open(dir.path()).unwrap();
        store.add_to_cart(&product(), 1).unwrap();
        drop(store);

        let mut shipping = info();
        shipping.email = "not-an-email".to_owned();
        let err = submit(dir.path(), shipping, Duration::ZERO).unwrap_err();
        assert!(matches!(err, CliError::Checkout(CheckoutError::Validation(_))));

        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get(CART_KEY).unwrap().is_some());
        assert_eq!(OrderReceipt::load_last(&storage).unwrap(), None);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = submit(dir.path(), info(), Duration::ZERO).unwrap_err();
        assert!(matches!(err, CliError::Checkout(CheckoutError::EmptyCart)));
    }
}
