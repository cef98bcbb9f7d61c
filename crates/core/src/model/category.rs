use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Workbook subject a progress entry belongs to.
///
/// The serialized spellings are the ones written into storage keys and entry
/// payloads, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "BTM")]
    Btm,
    #[serde(rename = "CTM")]
    Ctm,
    #[serde(rename = "English")]
    English,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Btm, Category::Ctm, Category::English];

    /// Canonical persisted spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Btm => "BTM",
            Category::Ctm => "CTM",
            Category::English => "English",
        }
    }

    /// Human-readable subject title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Category::Btm => "Basic Thinking Math",
            Category::Ctm => "Critical Thinking Math",
            Category::English => "English",
        }
    }

    /// Strict parse accepting only the canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Unknown` for anything else, including case variants.
    pub fn from_canonical(value: &str) -> Result<Self, CategoryError> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| CategoryError::Unknown(value.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for user input: case-insensitive and whitespace-tolerant.
impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("unknown category: {0}")]
    Unknown(String),
}
