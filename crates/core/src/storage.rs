//! Durable key-value storage for client-side state.
//!
//! The cart and the last order receipt each live under their own key. Values
//! are whole JSON documents; every write replaces the previous value.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Key holding the persisted cart.
pub const CART_KEY: &str = "cart";

/// Key holding the last order receipt.
pub const LAST_ORDER_KEY: &str = "lastOrder";

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous string store keyed by namespace.
///
/// Implementations take `&self` for writes; stores that need mutation use
/// interior mutability so handles can be shared between the cart and the
/// checkout flow.
pub trait Storage {
    /// Read the value under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(CART_KEY).unwrap(), None);

        storage.set(CART_KEY, "[]").unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));

        storage.remove(CART_KEY).unwrap();
        storage.remove(CART_KEY).unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set(LAST_ORDER_KEY, "{}").unwrap();
        assert_eq!(b.get(LAST_ORDER_KEY).unwrap().as_deref(), Some("{}"));
    }
}
