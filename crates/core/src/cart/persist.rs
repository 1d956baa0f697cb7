//! Persisted cart format.
//!
//! Written shape: `{"version": 1, "items": [{"product": {...}, "quantity": 2}]}`.
//! A bare array of items (the unversioned shape) is still read and is
//! rewritten in the versioned shape on the next mutation.

use serde::{Deserialize, Serialize};

use super::{Cart, CartItem};

/// Current persisted cart schema version.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// Reasons a persisted cart could not be read.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("malformed cart document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported cart schema version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Serialize)]
struct VersionedRef<'a> {
    version: u32,
    items: &'a [CartItem],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned { version: u32, items: Vec<CartItem> },
    Legacy(Vec<CartItem>),
}

impl Cart {
    /// Encode the cart in the current persisted shape.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&VersionedRef {
            version: CART_SCHEMA_VERSION,
            items: &self.items,
        })
    }

    /// Decode a persisted cart, accepting the current and legacy shapes.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Malformed` for unparseable input and
    /// `PersistError::UnsupportedVersion` for a version this build does not
    /// know.
    pub fn from_json(raw: &str) -> Result<Self, PersistError> {
        let items = match serde_json::from_str::<Stored>(raw)? {
            Stored::Versioned { version, items } if version == CART_SCHEMA_VERSION => items,
            Stored::Versioned { version, .. } => {
                return Err(PersistError::UnsupportedVersion(version));
            }
            Stored::Legacy(items) => items,
        };
        Ok(Self::from_items(items))
    }
}
