//! Wire DTOs for the item server.
//!
//! DESIGN
//! ======
//! Items are server-owned; the client keeps a read-only copy and never edits
//! one locally. Ids are opaque: the server may hand out integers or strings,
//! so `ItemId` keeps whichever representation it received.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque item identifier assigned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ItemId {
    type Err = std::convert::Infallible;

    /// Canonical integers parse as [`ItemId::Number`]; anything else, such as
    /// `007` or `+5`, is kept as text so the path segment matches the input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) if n.to_string() == trimmed => Self::Number(n),
            _ => Self::Text(trimmed.to_owned()),
        })
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// An image item as returned by `GET /items`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Server-assigned identifier.
    pub id: ItemId,
    /// Absolute or server-relative URL of the stored image.
    pub image_url: String,
    /// Free-text description; the only mutable field.
    pub description: String,
    /// Creation timestamp as sent by the server. Parsed at render time.
    pub created_at: String,
}

/// Body of `PUT /items/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionPatch {
    pub description: String,
}
