//! Catalog product types.
//!
//! These types represent validated domain objects separate from database row
//! types. The JSON shape follows the document the store has always served:
//! camel-cased fields and the identifier under `_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque identifier assigned by the product store.
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price, never negative.
    pub price: Price,
    pub category: Category,
    /// Image references, first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Units on hand.
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Image shown when a product has none of its own.
    pub const DEFAULT_IMAGE: &'static str = "/products/default-product.jpg";

    /// Whether at least one unit is on hand.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// The primary image path.
    ///
    /// Bare file names are resolved under `/products/`; a product without
    /// images gets [`Self::DEFAULT_IMAGE`].
    #[must_use]
    pub fn primary_image(&self) -> String {
        match self.images.first().map(|s| s.trim()) {
            Some(path) if path.starts_with('/') => path.to_owned(),
            Some(path) if !path.is_empty() => format!("/products/{path}"),
            _ => Self::DEFAULT_IMAGE.to_owned(),
        }
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// `needle_lower` must already be lowercased.
    #[must_use]
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// A product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    pub stock: u32,
}

/// A partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl ProductUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.images.is_none()
            && self.stock.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    /// Build a product for tests. `created` is seconds since the epoch.
    pub(crate) fn product(id: &str, name: &str, cents: i64, category: Category, created: i64) -> Product {
        let at = Utc.timestamp_opt(created, 0).unwrap();
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: format!("{name} description"),
            price: Price::from_cents(cents).unwrap(),
            category,
            images: Vec::new(),
            stock: 10,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_json_shape() {
        let p = product("abc123", "Smartwatch", 29_999, Category::Electronics, 0);
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["_id"], json!("abc123"));
        assert_eq!(value["price"], json!("299.99"));
        assert_eq!(value["category"], json!("Electronics"));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_deserialize_document_with_numeric_price() {
        let p: Product = serde_json::from_value(json!({
            "_id": "65f1",
            "name": "Wireless Mouse",
            "description": "Ergonomic wireless mouse with RGB lighting",
            "price": 49.99,
            "category": "Electronics",
            "images": ["/products/mouse.jpg"],
            "stock": 100,
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(p.price, Price::from_cents(4_999).unwrap());
        assert_eq!(p.primary_image(), "/products/mouse.jpg");
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_value::<NewProduct>(json!({
            "name": "Broken",
            "description": "",
            "price": "1.00",
            "category": "Mobile",
            "stock": -1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_primary_image_fallbacks() {
        let mut p = product("1", "Laptop", 100, Category::Computers, 0);
        assert_eq!(p.primary_image(), Product::DEFAULT_IMAGE);

        p.images = vec!["laptop.jpg".to_owned()];
        assert_eq!(p.primary_image(), "/products/laptop.jpg");
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let p = product("1", "Gaming Keyboard", 100, Category::Accessories, 0);
        assert!(p.matches_search("keyboard"));
        assert!(p.matches_search("description"));
        assert!(p.matches_search(""));
        assert!(!p.matches_search("mouse"));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());
        let update = ProductUpdate {
            stock: Some(3),
            ..ProductUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
