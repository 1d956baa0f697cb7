//! Core types for Emporium.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;

pub use category::{Category, CategoryError};
pub use id::{OrderId, ProductId};
pub use price::{Price, PriceError, format_amount};
