//! Order submission.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use super::{CheckoutError, FieldErrors, OrderReceipt, ShippingField, ShippingInfo};
use crate::cart::{CartItem, CartStore};
use crate::storage::Storage;
use crate::types::OrderId;

/// An order about to be placed.
#[derive(Debug, Clone, Copy)]
pub struct OrderDraft<'a> {
    pub items: &'a [CartItem],
    pub total: Decimal,
    pub shipping: &'a ShippingInfo,
}

/// Order processing failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ProcessorError(pub String);

/// Places an order somewhere. Orders are not recorded server-side, so the
/// provided processors only stand in for payment and fulfilment.
pub trait OrderProcessor {
    /// # Errors
    ///
    /// Returns an error if the order could not be placed.
    fn process(&self, order: &OrderDraft<'_>) -> Result<(), ProcessorError>;
}

/// Accepts every order immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateProcessor;

impl OrderProcessor for ImmediateProcessor {
    fn process(&self, _order: &OrderDraft<'_>) -> Result<(), ProcessorError> {
        Ok(())
    }
}

/// Accepts every order after blocking for a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct DelayedProcessor {
    pub delay: Duration,
}

impl Default for DelayedProcessor {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

impl OrderProcessor for DelayedProcessor {
    fn process(&self, _order: &OrderDraft<'_>) -> Result<(), ProcessorError> {
        std::thread::sleep(self.delay);
        Ok(())
    }
}

/// Where the checkout form is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Editing,
    Processing,
    Succeeded(Box<OrderReceipt>),
}

/// The checkout form and its submission.
pub struct Checkout<P = ImmediateProcessor> {
    info: ShippingInfo,
    errors: FieldErrors,
    state: CheckoutState,
    processor: P,
}

impl<P> fmt::Debug for Checkout<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("state", &self.state)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Default for Checkout<ImmediateProcessor> {
    fn default() -> Self {
        Self::new(ImmediateProcessor)
    }
}

impl<P: OrderProcessor> Checkout<P> {
    pub fn new(processor: P) -> Self {
        Self {
            info: ShippingInfo::default(),
            errors: FieldErrors::default(),
            state: CheckoutState::Editing,
            processor,
        }
    }

    #[must_use]
    pub const fn info(&self) -> &ShippingInfo {
        &self.info
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The receipt of the order just placed, if any.
    #[must_use]
    pub fn receipt(&self) -> Option<&OrderReceipt> {
        match &self.state {
            CheckoutState::Succeeded(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// Update one field and re-check it.
    pub fn set_field(&mut self, field: ShippingField, value: impl Into<String>) {
        self.info.set(field, value);
        self.errors.record(field, field.validate(self.info.get(field)));
    }

    /// Replace every field at once, re-checking all of them.
    pub fn set_info(&mut self, info: ShippingInfo) {
        self.info = info;
        self.errors = self.info.validate();
    }

    /// Place the order for everything in `cart`.
    ///
    /// On success the receipt is stored as the last order in the cart's
    /// storage and the cart is cleared. On any failure the cart is left as
    /// it was.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::AlreadyPlaced` if an order was placed and the form
    ///   has not been reset
    /// - `CheckoutError::Validation` with every field error
    /// - `CheckoutError::EmptyCart` if the cart holds no units
    /// - `CheckoutError::Processing` if the processor rejects the order
    /// - `CheckoutError::Storage`/`Encode` if the receipt cannot be saved
    #[instrument(skip_all, fields(items = cart.total_items()))]
    pub fn submit<S: Storage>(&mut self, cart: &mut CartStore<S>) -> Result<&OrderReceipt, CheckoutError> {
        if matches!(self.state, CheckoutState::Succeeded(_)) {
            return Err(CheckoutError::AlreadyPlaced);
        }

        self.errors = self.info.validate();
        if !self.errors.is_empty() {
            return Err(CheckoutError::Validation(self.errors.clone()));
        }
        if cart.total_items() == 0 {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Processing;
        let draft = OrderDraft {
            items: cart.items(),
            total: cart.total_price(),
            shipping: &self.info,
        };
        if let Err(e) = self.processor.process(&draft) {
            warn!(error = %e, "Order processing failed");
            self.state = CheckoutState::Editing;
            return Err(CheckoutError::Processing(e));
        }

        let now = Utc::now();
        let receipt = OrderReceipt {
            order_id: OrderId::from_timestamp(now),
            items: cart.items().to_vec(),
            total: cart.total_price(),
            shipping_info: self.info.clone(),
            timestamp: now,
        };
        if let Err(e) = receipt.save(cart.storage()) {
            self.state = CheckoutState::Editing;
            return Err(e);
        }

        // The order stands even if the emptied cart fails to persist.
        if let Err(e) = cart.clear() {
            warn!(error = %e, "Failed to persist cleared cart after order");
        }

        info!(order_id = %receipt.order_id, total = %receipt.total, "Order placed");
        self.state = CheckoutState::Succeeded(Box::new(receipt));
        self.receipt().ok_or(CheckoutError::AlreadyPlaced)
    }

    /// Return to an empty form, ready for the next order.
    pub fn reset(&mut self) {
        self.info = ShippingInfo::default();
        self.errors.clear();
        self.state = CheckoutState::Editing;
    }
}
