//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe, opaque string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// The wrapped value is never interpreted here; whoever assigns the ID
/// (the product store, the checkout flow) owns its format.
///
/// # Example
///
/// ```rust
/// # use emporium_core::define_id;
/// define_id!(WishlistId);
/// define_id!(ReviewId);
///
/// let wishlist = WishlistId::new("w-1");
/// let review = ReviewId::new("w-1");
///
/// // These are different types, so this won't compile:
/// // let _: WishlistId = review;
/// assert_eq!(wishlist.as_str(), review.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Assigned by the product store.
define_id!(ProductId);

define_id!(OrderId);

impl OrderId {
    /// Prefix of every locally generated order identifier.
    pub const PREFIX: &'static str = "ORD-";

    /// Derive an order ID from a point in time (`ORD-<unix millis>`).
    ///
    /// Two checkouts in the same millisecond get the same ID. There is no
    /// server-side order ledger, so nothing relies on uniqueness.
    #[must_use]
    pub fn from_timestamp(at: chrono::DateTime<chrono::Utc>) -> Self {
        Self(format!("{}{}", Self::PREFIX, at.timestamp_millis()))
    }
}
