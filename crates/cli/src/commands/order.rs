//! Inspect the locally stored order receipt.

use std::path::Path;

use emporium_core::format_amount;
use emporium_core::checkout::OrderReceipt;

use crate::error::CliError;
use crate::storage::FileStorage;

/// Print a receipt.
pub fn print(receipt: &OrderReceipt) {
    let shipping = &receipt.shipping_info;

    #[allow(clippy::print_stdout)]
    {
        println!("Order {} placed {}", receipt.order_id, receipt.timestamp.to_rfc3339());
        for item in &receipt.items {
            println!("  {} x {}", item.quantity, item.product.name);
        }
        println!("Total: {}", format_amount(receipt.total));
        println!("Ship to: {} <{}>", shipping.full_name, shipping.email);
        println!(
            "         {}, {} {}, {}",
            shipping.address, shipping.city, shipping.postal_code, shipping.country
        );
    }
}

/// Print the last order placed from this data directory.
///
/// # Errors
///
/// Returns `CliError::NotFound` if no order has been placed, or an error if
/// the stored receipt cannot be read.
pub fn last(data_dir: &Path) -> Result<(), CliError> {
    let storage = FileStorage::open(data_dir)?;
    let receipt = OrderReceipt::load_last(&storage)?
        .ok_or_else(|| CliError::NotFound("No order has been placed yet".to_owned()))?;
    print(&receipt);
    Ok(())
}
