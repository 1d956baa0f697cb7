//! Local order receipts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CheckoutError, ShippingInfo};
use crate::cart::CartItem;
use crate::storage::{LAST_ORDER_KEY, Storage};
use crate::types::OrderId;

/// Record of a placed order, kept only in client storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: OrderId,
    /// Cart lines as they were when the order was placed.
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub shipping_info: ShippingInfo,
    pub timestamp: DateTime<Utc>,
}

impl OrderReceipt {
    /// Store this receipt as the last order, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be encoded or written.
    pub fn save(&self, storage: &impl Storage) -> Result<(), CheckoutError> {
        let raw = serde_json::to_string(self)?;
        storage.set(LAST_ORDER_KEY, &raw)?;
        Ok(())
    }

    /// Load the last stored receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or holds an unreadable
    /// receipt.
    pub fn load_last(storage: &impl Storage) -> Result<Option<Self>, CheckoutError> {
        storage
            .get(LAST_ORDER_KEY)?
            .map(|raw| serde_json::from_str(&raw).map_err(CheckoutError::from))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::shipping::tests::valid_info;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_missing_receipt_is_none() {
        assert_eq!(OrderReceipt::load_last(&MemoryStorage::new()).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let receipt = OrderReceipt {
            order_id: OrderId::new("ORD-1"),
            items: Vec::new(),
            total: Decimal::new(24_998, 2),
            shipping_info: valid_info(),
            timestamp: Utc::now(),
        };
        receipt.save(&storage).unwrap();

        let raw = storage.get(LAST_ORDER_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["orderId"], "ORD-1");
        assert_eq!(value["shippingInfo"]["fullName"], "Ada Lovelace");

        assert_eq!(OrderReceipt::load_last(&storage).unwrap(), Some(receipt));
    }

    #[test]
    fn test_corrupt_receipt_is_an_error() {
        let storage = MemoryStorage::new();
        storage.set(LAST_ORDER_KEY, "[").unwrap();
        assert!(matches!(
            OrderReceipt::load_last(&storage),
            Err(CheckoutError::Encode(_))
        ));
    }
}
