//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string names no known [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Computers,
    Mobile,
    Accessories,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [
        Self::Electronics,
        Self::Computers,
        Self::Mobile,
        Self::Accessories,
    ];

    /// The stored and displayed name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Computers => "Computers",
            Self::Mobile => "Mobile",
            Self::Accessories => "Accessories",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    /// Parse a category name. Matching is exact, as stored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
