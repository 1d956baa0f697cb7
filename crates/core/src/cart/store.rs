//! The persisted cart store.

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{Cart, CartError, CartItem};
use crate::product::Product;
use crate::storage::{CART_KEY, Storage};
use crate::types::ProductId;

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    Added { product_id: ProductId, quantity: u32 },
    Removed { product_id: ProductId },
    QuantityUpdated { product_id: ProductId, quantity: u32 },
    Pruned { removed: usize },
    Cleared,
}

/// Delivered to subscribers after every mutation.
#[derive(Debug)]
pub struct CartEvent<'a> {
    pub change: CartChange,
    /// The cart after the change.
    pub cart: &'a Cart,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&CartEvent<'_>) + Send + Sync>;

/// A cart that writes itself through to storage.
///
/// Every mutation builds the next cart, swaps it in, serializes it whole
/// under [`CART_KEY`], then notifies subscribers. A failed write is
/// reported to the caller; the in-memory cart keeps the new state and the
/// next successful write catches storage up.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: Storage> CartStore<S> {
    /// Open the store, restoring whatever cart `storage` holds.
    ///
    /// Missing, unreadable, or corrupt data yields an empty cart.
    pub fn open(storage: S) -> Self {
        let cart = match storage.get(CART_KEY) {
            Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable persisted cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart");
                Cart::new()
            }
        };
        debug!(lines = cart.items().len(), "Cart restored");

        Self {
            cart,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add `quantity` units of `product`. Adding zero units changes nothing.
    ///
    /// Stock is not checked here; see [`super::ensure_in_stock`].
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }
        let mut next = self.cart.clone();
        next.add(product, quantity);
        self.commit(
            next,
            CartChange::Added {
                product_id: product.id.clone(),
                quantity,
            },
        )
    }

    /// Remove the product's line, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Result<(), CartError> {
        let mut next = self.cart.clone();
        next.remove(product_id);
        self.commit(
            next,
            CartChange::Removed {
                product_id: product_id.clone(),
            },
        )
    }

    /// Set the product's quantity to `max(0, quantity)`.
    ///
    /// Setting zero keeps the line; call [`Self::prune_empty`] to drop it.
    /// Products not in the cart are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Result<(), CartError> {
        let mut next = self.cart.clone();
        let Some(stored) = next.set_quantity(product_id, quantity) else {
            debug!(%product_id, "quantity update for product not in cart");
            return Ok(());
        };
        self.commit(
            next,
            CartChange::QuantityUpdated {
                product_id: product_id.clone(),
                quantity: stored,
            },
        )
    }

    /// Drop every zero-quantity line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn prune_empty(&mut self) -> Result<(), CartError> {
        let mut next = self.cart.clone();
        let removed = next.prune_empty();
        self.commit(next, CartChange::Pruned { removed })
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Cart::new(), CartChange::Cleared)
    }

    /// Register a listener called after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartEvent<'_>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, next: Cart, change: CartChange) -> Result<(), CartError> {
        self.cart = next;
        let persisted = self.persist();

        let event = CartEvent {
            change,
            cart: &self.cart,
        };
        for (_, listener) in &self.listeners {
            listener(&event);
        }

        persisted
    }

    fn persist(&self) -> Result<(), CartError> {
        let raw = self.cart.to_json()?;
        self.storage.set(CART_KEY, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::product::tests::product;
    use crate::storage::{MemoryStorage, StorageError};
    use crate::types::Category;

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        let a = product("a", "A", 100, Category::Electronics, 0);

        store.add_to_cart(&a, 2).unwrap();
        let reopened = CartStore::open(storage.clone());
        assert_eq!(reopened.total_items(), 2);

        store.update_quantity(&a.id, 0).unwrap();
        let reopened = CartStore::open(storage.clone());
        assert_eq!(reopened.items().len(), 1);
        assert_eq!(reopened.total_items(), 0);

        store.remove_from_cart(&a.id).unwrap();
        assert!(CartStore::open(storage).cart().is_empty());
    }

    #[test]
    fn test_open_falls_back_on_corrupt_data() {
        let storage = MemoryStorage::new();
        storage.set(CART_KEY, "definitely not json").unwrap();

        let store = CartStore::open(storage);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_restore_round_trip() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store
            .add_to_cart(&product("b", "B", 4_999, Category::Accessories, 0), 3)
            .unwrap();
        store
            .add_to_cart(&product("a", "A", 19_999, Category::Electronics, 0), 1)
            .unwrap();

        let restored = CartStore::open(storage);
        assert_eq!(restored.items(), store.items());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let seen: Arc<Mutex<Vec<(CartChange, u64)>>> = Arc::default();
        let mut store = CartStore::open(MemoryStorage::new());
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |event| {
            sink.lock()
                .unwrap()
                .push((event.change.clone(), event.cart.total_items()));
        });

        let a = product("a", "A", 100, Category::Electronics, 0);
        store.add_to_cart(&a, 2).unwrap();
        store.update_quantity(&a.id, 5).unwrap();
        assert!(store.unsubscribe(id));
        store.clear().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (
                    CartChange::Added {
                        product_id: a.id.clone(),
                        quantity: 2
                    },
                    2
                ),
                (
                    CartChange::QuantityUpdated {
                        product_id: a.id.clone(),
                        quantity: 5
                    },
                    5
                ),
            ]
        );
    }

    #[test]
    fn test_write_failure_is_reported_but_state_advances() {
        let mut store = CartStore::open(ReadOnlyStorage);
        let a = product("a", "A", 100, Category::Electronics, 0);

        let result = store.add_to_cart(&a, 1);
        assert!(matches!(result, Err(CartError::Storage(_))));
        assert_eq!(store.total_items(), 1);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store
            .add_to_cart(&product("a", "A", 100, Category::Electronics, 0), 0)
            .unwrap();
        assert!(store.cart().is_empty());
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_missing_product_is_silent() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store
            .add_to_cart(&product("a", "A", 100, Category::Electronics, 0), 1)
            .unwrap();
        let before = storage.get(CART_KEY).unwrap();

        let events = Arc::new(Mutex::new(0_u32));
        let sink = Arc::clone(&events);
        store.subscribe(move |_| *sink.lock().unwrap() += 1);

        store.update_quantity(&ProductId::new("missing"), 3).unwrap();
        assert_eq!(*events.lock().unwrap(), 0);
        assert_eq!(storage.get(CART_KEY).unwrap(), before);
        assert_eq!(store.total_items(), 1);
    }

    #[test]
    fn test_open_rejects_out_of_range_price() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store
            .add_to_cart(&product("a", "A", 100, Category::Electronics, 0), 2)
            .unwrap();

        let mut doc: serde_json::Value =
            serde_json::from_str(&storage.get(CART_KEY).unwrap().unwrap()).unwrap();
        doc["items"][0]["product"]["price"] = Decimal::MAX.to_string().into();
        storage.set(CART_KEY, &doc.to_string()).unwrap();

        let reopened = CartStore::open(storage);
        assert!(reopened.cart().is_empty());
        assert_eq!(reopened.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_prune_empty() {
        let mut store = CartStore::open(MemoryStorage::new());
        let a = product("a", "A", 100, Category::Electronics, 0);
        let b = product("b", "B", 100, Category::Electronics, 0);
        store.add_to_cart(&a, 1).unwrap();
        store.add_to_cart(&b, 1).unwrap();
        store.update_quantity(&a.id, 0).unwrap();

        store.prune_empty().unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].product.id, b.id);
    }
}
