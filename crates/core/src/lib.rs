//! Emporium Core - storefront domain library.
//!
//! This crate provides the pieces of the storefront that do not talk to the
//! network or the database:
//! - `storefront` - Serves the product catalog as JSON
//! - `cli` - Operator tools and the shopper client that owns the cart
//!
//! # Architecture
//!
//! Everything here is synchronous. Persistence of client-side state goes
//! through the [`storage::Storage`] trait so the same cart and checkout code
//! runs against memory in tests and against files in the CLI.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and categories
//! - [`product`] - The catalog entry shape and its insert/update payloads
//! - [`storage`] - Durable key-value storage for client state
//! - [`cart`] - The persisted cart store
//! - [`catalog`] - Search, filter, sort and paginate over a product list
//! - [`checkout`] - Shipping validation, order submission and receipts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod product;
pub mod storage;
pub mod types;

pub use product::{NewProduct, Product, ProductUpdate};
pub use types::*;
