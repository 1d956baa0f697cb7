//! Client-side shopping cart.
//!
//! [`Cart`] is the plain value: an ordered list of lines with at most one
//! line per product. [`CartStore`] owns a cart, writes it through to
//! [`Storage`](crate::storage::Storage) after every mutation, and notifies
//! subscribers.

mod persist;
mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

pub use persist::{CART_SCHEMA_VERSION, PersistError};
pub use store::{CartChange, CartEvent, CartStore, SubscriptionId};

/// Cart errors.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("This product is out of stock")]
    OutOfStock(ProductId),
    #[error("failed to persist cart: {0}")]
    Storage(#[from] crate::storage::StorageError),
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One cart line: a product snapshot and the desired quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * self.quantity
    }
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, merging lines that share a product.
    ///
    /// Used when restoring persisted state, which may have been written by
    /// something that did not uphold the one-line-per-product rule.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(&item.product, item.quantity);
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price times quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Increment the product's line by `quantity`, appending a line if the
    /// product is not in the cart yet.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity,
            });
        }
    }

    /// Drop the product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != product_id);
        self.items.len() != before
    }

    /// Set the product's quantity to `max(0, quantity)`.
    ///
    /// A line set to zero stays in the cart; see [`Cart::prune_empty`].
    /// Returns the stored quantity, or `None` if the product is not in the
    /// cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Option<u32> {
        let clamped = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.product.id == product_id)?;
        item.quantity = clamped;
        Some(clamped)
    }

    /// Drop every zero-quantity line. Returns how many were dropped.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.quantity > 0);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Fail with [`CartError::OutOfStock`] when the product has nothing on hand.
///
/// The cart itself never checks stock; callers run this before adding.
///
/// # Errors
///
/// Returns `CartError::OutOfStock` if `product.stock == 0`.
pub fn ensure_in_stock(product: &Product) -> Result<(), CartError> {
    if product.in_stock() {
        Ok(())
    } else {
        Err(CartError::OutOfStock(product.id.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::product::tests::product;
    use crate::types::{Category, Price};

    fn unique_ids(cart: &Cart) -> bool {
        let ids: HashSet<_> = cart.items().iter().map(|i| &i.product.id).collect();
        ids.len() == cart.items().len()
    }

    #[test]
    fn test_add_merges_same_product() {
        let headphones = product("a", "Headphones", 19_999, Category::Electronics, 0);
        let mut cart = Cart::new();
        cart.add(&headphones, 1);
        cart.add(&headphones, 2);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&headphones.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_appends_in_order() {
        let a = product("a", "A", 100, Category::Electronics, 0);
        let b = product("b", "B", 200, Category::Mobile, 0);
        let mut cart = Cart::new();
        cart.add(&b, 1);
        cart.add(&a, 1);

        let ids: Vec<_> = cart.items().iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_set_quantity_clamps_and_keeps_zero_line() {
        let a = product("a", "A", 100, Category::Electronics, 0);
        let mut cart = Cart::new();
        cart.add(&a, 4);

        assert_eq!(cart.set_quantity(&a.id, -5), Some(0));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);

        assert_eq!(cart.prune_empty(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_product() {
        let mut cart = Cart::new();
        assert_eq!(cart.set_quantity(&ProductId::new("nope"), 3), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let a = product("a", "A", 100, Category::Electronics, 0);
        let mut cart = Cart::new();
        cart.add(&a, 1);
        assert!(!cart.remove(&ProductId::new("b")));
        assert_eq!(cart.items().len(), 1);
        assert!(cart.remove(&a.id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_hold_over_mutation_sequence() {
        let products = [
            product("a", "A", 19_999, Category::Electronics, 0),
            product("b", "B", 4_999, Category::Accessories, 0),
            product("c", "C", 99_999, Category::Mobile, 0),
        ];
        let mut cart = Cart::new();

        // Deterministic pseudo-random walk over add/remove/update.
        let mut seed: u64 = 0x2545_f491;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let pick = usize::try_from((seed >> 33) % 3).unwrap();
            let target = &products[pick];
            match (seed >> 40) % 4 {
                0 | 1 => cart.add(target, u32::try_from((seed >> 50) % 4 + 1).unwrap()),
                2 => {
                    cart.remove(&target.id);
                }
                _ => {
                    cart.set_quantity(&target.id, i64::try_from((seed >> 45) % 7).unwrap() - 2);
                }
            }

            assert!(unique_ids(&cart));
            let expected_items: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
            let expected_price: Decimal = cart
                .items()
                .iter()
                .map(|i| i.product.price.amount() * Decimal::from(i.quantity))
                .sum();
            assert_eq!(cart.total_items(), expected_items);
            assert_eq!(cart.total_price(), expected_price);
        }
    }

    #[test]
    fn test_from_items_merges_duplicates() {
        let a = product("a", "A", 100, Category::Electronics, 0);
        let cart = Cart::from_items([
            CartItem { product: a.clone(), quantity: 1 },
            CartItem { product: a, quantity: 2 },
        ]);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_total_price_at_bounds() {
        let mut a = product("a", "A", 100, Category::Electronics, 0);
        let mut b = product("b", "B", 100, Category::Electronics, 0);
        a.price = Price::MAX;
        b.price = Price::MAX;
        let mut cart = Cart::new();
        cart.add(&a, u32::MAX);
        cart.add(&b, u32::MAX);
        cart.add(&a, 1);

        let line = Price::MAX.amount() * Decimal::from(u32::MAX);
        assert_eq!(cart.get(&a.id).unwrap().quantity, u32::MAX);
        assert_eq!(cart.total_price(), line + line);
    }

    #[test]
    fn test_ensure_in_stock() {
        let mut a = product("a", "A", 100, Category::Electronics, 0);
        assert!(ensure_in_stock(&a).is_ok());
        a.stock = 0;
        assert!(matches!(ensure_in_stock(&a), Err(CartError::OutOfStock(_))));
    }
}
