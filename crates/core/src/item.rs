//! The catalog record and its strongly-typed identifier.

use core::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// Hyphenated RFC-4122 v4 layout: version nibble fixed to 4, variant nibble
// restricted to 8/9/a/b. Uuid::parse_str alone also accepts simple and urn
// forms, which the API boundary rejects.
static UUID_V4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$")
        .expect("valid uuid v4 regex")
});

/// Identifier of a catalog item.
///
/// Generated by the service on create (UUIDv4) and immutable afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a fresh identifier. Prefer passing IDs explicitly in tests for
    /// determinism.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ItemId> for Uuid {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl FromStr for ItemId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !UUID_V4_RE.is_match(s) {
            return Err(ValidationError::InvalidIdentifier);
        }
        let uuid = Uuid::parse_str(s).map_err(|_| ValidationError::InvalidIdentifier)?;
        Ok(Self(uuid))
    }
}

/// A catalog record. Field constraints are enforced by [`crate::validate`]
/// before an `Item` is ever constructed; an `Item` in a `Catalog` is assumed
/// to already be sanitized and in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Defaults to the empty string when absent at creation.
    #[serde(default)]
    pub description: String,
    /// Non-negative, rounded to 2 decimal places.
    pub price: f64,
}

/// The whole persisted document: `{"items": [...]}`.
///
/// Ordered; insertion order is preserved for listing. No two items share an
/// `id` (the service only ever appends freshly generated ids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_v4_and_round_trip_via_display() {
        let id = ItemId::new();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn from_str_rejects_non_v4_layouts() {
        // v1 uuid (version nibble 1)
        let err = "f81d4fae-7dec-11d0-a765-00a0c91e6bf6".parse::<ItemId>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidIdentifier);

        // simple (non-hyphenated) form of a valid v4
        let id = ItemId::new();
        let simple = id.as_uuid().simple().to_string();
        assert!(simple.parse::<ItemId>().is_err());

        assert!("not-a-uuid".parse::<ItemId>().is_err());
        assert!("".parse::<ItemId>().is_err());
    }

    #[test]
    fn from_str_is_case_insensitive() {
        let id = ItemId::new();
        let upper = id.to_string().to_uppercase();
        assert_eq!(upper.parse::<ItemId>().unwrap(), id);
    }

    #[test]
    fn catalog_document_layout_is_items_array() {
        let catalog = Catalog {
            items: vec![Item {
                id: ItemId::new(),
                name: "Papaya".to_string(),
                description: String::new(),
                price: 2500.0,
            }],
        };
        let value = serde_json::to_value(&catalog).unwrap();
        assert!(value["items"].is_array());
        assert_eq!(value["items"][0]["name"], "Papaya");

        // Absent items array tolerated on read.
        let empty: Catalog = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());
    }
}
