//! Catalog identifiers.
//!
//! Every catalog object the engine sees is referred to by an opaque string
//! identifier issued upstream (database keys, UUIDs, slugs). The engine only
//! compares them for equality and ordering; it never parses them.
//!
//! Each kind of identifier gets its own newtype so a card id cannot be
//! passed where an edition id is expected.

use serde::{Deserialize, Serialize};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Check whether this is the empty (unresolved) sentinel.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a format (a named ruleset).
    FormatId,
    "Format"
);

catalog_id!(
    /// Identifier of the underlying card, shared by all of its printings.
    ///
    /// Copy limits aggregate on this id.
    CardId,
    "Card"
);

catalog_id!(
    /// Identifier of one specific printing of a card.
    PrintingId,
    "Printing"
);

catalog_id!(
    /// Identifier of an edition (set).
    EditionId,
    "Edition"
);

catalog_id!(
    /// Identifier of a block (group of editions).
    BlockId,
    "Block"
);

catalog_id!(
    /// Identifier of a card type (ally, talisman, gold, ...).
    CardTypeId,
    "CardType"
);

catalog_id!(
    /// Identifier of a race.
    RaceId,
    "Race"
);

catalog_id!(
    /// Identifier of a rarity tier.
    RarityId,
    "Rarity"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new("c-42");
        assert_eq!(id.as_str(), "c-42");
        assert_eq!(format!("{}", id), "Card(c-42)");
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(CardId::default().is_empty());
        assert!(CardId::new("  ").is_empty());
        assert!(!CardId::new("x").is_empty());
    }

    #[test]
    fn test_ids_are_distinct_types() {
        let edition: EditionId = "e1".into();
        let block: BlockId = String::from("b1").into();
        assert_eq!(edition.as_str(), "e1");
        assert_eq!(block.as_str(), "b1");
    }

    #[test]
    fn test_transparent_serialization() {
        let id = RaceId::new("dragon");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"dragon\"");

        let back: RaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
