//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::ops::Mul;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount does not fit the stored `NUMERIC(12, 2)` column.
    #[error("price too large (got {0}, max 9999999999.99)")]
    TooLarge(Decimal),
    /// The amount has fractions of a cent.
    #[error("price has more than 2 decimal places (got {0})")]
    TooPrecise(Decimal),
}

/// A non-negative unit price in the store's currency.
///
/// Serializes as the underlying decimal (a string, e.g. `"199.99"`) and
/// accepts either a string or a JSON number when deserializing. Negative
/// amounts are rejected at construction, so every `Price` in the system
/// upholds `price >= 0`.
///
/// ## Examples
///
/// ```
/// use emporium_core::Price;
/// use rust_decimal::Decimal;
///
/// assert!(Price::new(Decimal::new(19_999, 2)).is_ok());
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest storable price, `9999999999.99`.
    pub const MAX: Self = Self(Decimal::from_parts(3_567_587_327, 232, 0, false, 2));

    /// Create a price in `0..=Price::MAX` with at most two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount < 0`,
    /// `PriceError::TooLarge` above [`Self::MAX`] and
    /// `PriceError::TooPrecise` for fractions of a cent.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge(amount));
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents < 0` and
    /// `PriceError::TooLarge` above [`Self::MAX`].
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(self) -> String {
        format_amount(self.0)
    }
}

/// Format a money amount such as a line or cart total, which may exceed
/// [`Price::MAX`], the way [`Price::display`] does.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl Mul<u32> for Price {
    type Output = Decimal;

    fn mul(self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
