//! Identifier minting and resolution
//!
//! All IDs use the format: `{kind}-{uuid-v7-simple}`
//! Example: `trip-0190a6b2c4e87d3e9f1a2b3c4d5e6f70`
//!
//! Identifiers are opaque. They exist for rendering and addressing only;
//! packed-state carryover never looks at them.

use uuid::Uuid;

/// What an identifier names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Trip,
    Category,
    Item,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Trip => "trip",
            Self::Category => "cat",
            Self::Item => "item",
        }
    }
}

/// Mint a fresh identifier; never reused
pub fn generate_id(kind: IdKind) -> String {
    format!("{}-{}", kind.prefix(), Uuid::now_v7().simple())
}

/// ID resolution for partial matches
pub struct IdResolver<'a> {
    ids: Vec<&'a str>,
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<String>, Vec<String>> {
        // An exact hit wins even when it is also a prefix of another id
        if let Some(exact) = self.ids.iter().find(|id| **id == reference) {
            return Ok(Some(exact.to_string()));
        }

        let mut matches: Vec<String> = self
            .ids
            .iter()
            .filter(|id| Self::matches(id, reference))
            .map(|id| id.to_string())
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(matches),
        }
    }

    /// Check if an ID matches a reference
    fn matches(id: &str, reference: &str) -> bool {
        if reference.is_empty() {
            return false;
        }

        if id.starts_with(reference) {
            return true;
        }

        // Prefix of the uuid part, so `tp show 0190a6` works
        if let Some((_, uuid_part)) = id.split_once('-') {
            return uuid_part.starts_with(reference);
        }

        false
    }
}
