//! Checkout: shipping form validation, order submission, receipts.

mod flow;
mod receipt;
mod shipping;

pub use flow::{
    Checkout, CheckoutState, DelayedProcessor, ImmediateProcessor, OrderDraft, OrderProcessor,
    ProcessorError,
};
pub use receipt::OrderReceipt;
pub use shipping::{FieldErrors, ShippingField, ShippingInfo, UnknownFieldError};

use crate::storage::StorageError;

/// Checkout errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Please correct the shipping details: {0}")]
    Validation(FieldErrors),
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Failed to place order. Please try again.")]
    Processing(#[source] ProcessorError),
    #[error("This order has already been placed")]
    AlreadyPlaced,
    #[error("failed to store order receipt: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode order receipt: {0}")]
    Encode(#[from] serde_json::Error),
}
