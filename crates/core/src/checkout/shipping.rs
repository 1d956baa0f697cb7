//! Shipping details and their validation rules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s]+$").expect("Invalid regex"));

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z\s-]+$").expect("Invalid regex"));

/// Where an order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    pub country: String,
}

/// A form field of [`ShippingInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShippingField {
    FullName,
    Email,
    Phone,
    Address,
    City,
    PostalCode,
    Country,
}

impl ShippingField {
    /// All fields in form order.
    pub const ALL: [Self; 7] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::PostalCode,
        Self::Country,
    ];

    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
        }
    }

    /// Check one value against this field's rule.
    ///
    /// Returns the message to show, or `None` if the value is acceptable.
    #[must_use]
    pub fn validate(self, value: &str) -> Option<&'static str> {
        match self {
            Self::FullName => value.is_empty().then_some("Full name is required"),
            Self::Email if value.is_empty() => Some("Email is required"),
            Self::Email => (!EMAIL_RE.is_match(value)).then_some("Please enter a valid email address"),
            Self::Phone if value.is_empty() => Some("Phone number is required"),
            Self::Phone => (!PHONE_RE.is_match(value)).then_some("Please enter a valid phone number"),
            Self::Address => value.is_empty().then_some("Address is required"),
            Self::City => value.is_empty().then_some("City is required"),
            // Optional.
            Self::PostalCode if value.is_empty() => None,
            Self::PostalCode => {
                (!POSTAL_CODE_RE.is_match(value)).then_some("Please enter a valid postal code")
            }
            Self::Country => value.is_empty().then_some("Country is required"),
        }
    }
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown form field name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown shipping field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for ShippingField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFieldError(s.to_owned()))
    }
}

impl ShippingInfo {
    #[must_use]
    pub fn get(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::FullName => &self.full_name,
            ShippingField::Email => &self.email,
            ShippingField::Phone => &self.phone,
            ShippingField::Address => &self.address,
            ShippingField::City => &self.city,
            ShippingField::PostalCode => &self.postal_code,
            ShippingField::Country => &self.country,
        }
    }

    pub fn set(&mut self, field: ShippingField, value: impl Into<String>) {
        let slot = match field {
            ShippingField::FullName => &mut self.full_name,
            ShippingField::Email => &mut self.email,
            ShippingField::Phone => &mut self.phone,
            ShippingField::Address => &mut self.address,
            ShippingField::City => &mut self.city,
            ShippingField::PostalCode => &mut self.postal_code,
            ShippingField::Country => &mut self.country,
        };
        *slot = value.into();
    }

    /// Validate every field.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in ShippingField::ALL {
            errors.record(field, field.validate(self.get(field)));
        }
        errors
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<ShippingField, String>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: ShippingField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShippingField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Set or clear the message for `field`.
    pub fn record(&mut self, field: ShippingField, message: Option<&str>) {
        match message {
            Some(message) => {
                self.0.insert(field, message.to_owned());
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}
