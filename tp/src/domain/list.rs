//! Packing list types
//!
//! Two shapes of the same list exist:
//!
//! - [`RawCategory`] / [`RawItem`] carry only names and provenance. This is what
//!   templates produce, what the merge engine works on, and what the oracle
//!   sees and returns.
//! - [`PackingCategory`] / [`PackingItem`] add identifiers and the packed flag.
//!   This is what a [`Trip`](super::Trip) owns and what gets persisted.
//!
//! Field names on the wire match the stored history format:
//! `{ "category": ..., "items": [{ "name": ..., "source": "user" | "ai" }] }`.

use serde::{Deserialize, Serialize};

/// Where an item came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Contributed by the user's templates
    #[default]
    #[serde(rename = "user")]
    User,
    /// Suggested by the oracle
    #[serde(rename = "ai", alias = "oracle")]
    Oracle,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Oracle => "ai",
        }
    }

    /// Parse a wire tag; `None` for anything outside the schema
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(Self::User),
            "ai" | "oracle" => Some(Self::Oracle),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An item without identity or packed state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub name: String,
    #[serde(default)]
    pub source: Provenance,
}

impl RawItem {
    pub fn new(name: impl Into<String>, source: Provenance) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new(name, Provenance::User)
    }

    pub fn oracle(name: impl Into<String>) -> Self {
        Self::new(name, Provenance::Oracle)
    }
}

/// A category of raw items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "category")]
    pub name: String,
    pub items: Vec<RawItem>,
}

impl RawCategory {
    pub fn new(name: impl Into<String>, items: Vec<RawItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// An item on a persisted list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub source: Provenance,
    #[serde(default)]
    pub packed: bool,
}

/// A category on a persisted list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingCategory {
    pub id: String,
    #[serde(rename = "category")]
    pub name: String,
    pub items: Vec<PackingItem>,
}

/// Ordered categories owned by one trip
pub type PackingList = Vec<PackingCategory>;

/// Normalized name used for every equality check: trimmed, lowercased
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Packed-state key: `category|item`, both normalized
pub fn item_key(category: &str, item: &str) -> String {
    format!("{}|{}", name_key(category), name_key(item))
}

/// Project a persisted list down to names and provenance
///
/// Identifiers and packed flags are dropped; this is the shape the oracle sees.
pub fn simplify(list: &[PackingCategory]) -> Vec<RawCategory> {
    list.iter()
        .map(|cat| RawCategory {
            name: cat.name.clone(),
            items: cat
                .items
                .iter()
                .map(|item| RawItem::new(item.name.clone(), item.source))
                .collect(),
        })
        .collect()
}

/// `(packed, total)` item counts
pub fn progress(list: &[PackingCategory]) -> (usize, usize) {
    list.iter().flat_map(|c| c.items.iter()).fold((0, 0), |(packed, total), item| {
        (packed + usize::from(item.packed), total + 1)
    })
}
