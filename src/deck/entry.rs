//! Deck entries - resolved deck lines.
//!
//! A `DeckEntry` is one line of a deck after catalog resolution. It carries
//! every attribute any rule or statistic needs, so the engine never looks
//! anything up by id.
//!
//! ## Unresolved Lines
//!
//! When upstream resolution fails (unknown name, ambiguous printing), the
//! line is still handed to the engine as an entry with an empty `card_id`.
//! See `DeckEntry::unresolved`. Over JSON the identity and classification
//! fields may also arrive as `null`; they read as empty sentinels.

use serde::{Deserialize, Deserializer, Serialize};

use super::ids::{BlockId, CardId, CardTypeId, EditionId, PrintingId, RaceId, RarityId};

/// Per-printing legal status, independent of any format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalStatus {
    /// Playable without restriction.
    #[default]
    Legal,
    /// Playable; the format may cap copies through a card limit override.
    Restricted,
    /// Not playable.
    Banned,
    /// No longer supported; severity is decided by the format.
    Discontinued,
}

impl LegalStatus {
    /// Upper-case label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LegalStatus::Legal => "LEGAL",
            LegalStatus::Restricted => "RESTRICTED",
            LegalStatus::Banned => "BANNED",
            LegalStatus::Discontinued => "DISCONTINUED",
        }
    }
}

impl std::fmt::Display for LegalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One resolved line of a deck.
///
/// ## Example
///
/// ```
/// use ccg_deckcheck::deck::{DeckEntry, LegalStatus};
///
/// let entry = DeckEntry::new("p-1", "c-1", "Golden Dragon")
///     .with_card_type("t-ally", "ALLY", "Ally")
///     .with_cost(4)
///     .with_qty(2);
///
/// assert_eq!(entry.qty, 2);
/// assert_eq!(entry.legal_status, LegalStatus::Legal);
/// assert!(entry.is_resolved());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckEntry {
    /// The specific printing used.
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_printing_id: PrintingId,

    /// The underlying card. Empty when upstream resolution failed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_id: CardId,

    /// Number of copies represented by this line (at least 1).
    #[serde(default = "one", deserialize_with = "deser_qty")]
    pub qty: u32,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub card_type_id: CardTypeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_type_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_type_name: String,

    #[serde(default)]
    pub race_id: Option<RaceId>,
    #[serde(default)]
    pub race_name: Option<String>,

    #[serde(default)]
    pub rarity_tier_id: Option<RarityId>,
    #[serde(default)]
    pub rarity_name: Option<String>,

    #[serde(default)]
    pub legal_status: LegalStatus,

    #[serde(default, deserialize_with = "null_as_default")]
    pub edition_id: EditionId,

    /// Block of the edition. `None` for editions outside every block.
    #[serde(default)]
    pub block_id: Option<BlockId>,

    /// Unique cards default to one copy per deck.
    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub has_ability: bool,

    /// Whether this card may be designated as the starting gold.
    #[serde(default)]
    pub can_be_starting_gold: bool,

    /// Whether this line is designated as the deck's starting gold.
    #[serde(default)]
    pub is_starting_gold: bool,

    /// Cost. `None` for card types without a cost.
    #[serde(default)]
    pub cost: Option<i32>,
}

// Field deserializers for `#[serde(deserialize_with = "...")]`.

const fn one() -> u32 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Same clamp as `DeckEntry::with_qty`: missing, `null` and `0` read as 1.
fn deser_qty<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(1).max(1))
}

impl DeckEntry {
    /// Create a legal, single-copy entry with empty classification.
    #[must_use]
    pub fn new(
        card_printing_id: impl Into<PrintingId>,
        card_id: impl Into<CardId>,
        card_name: impl Into<String>,
    ) -> Self {
        Self {
            card_printing_id: card_printing_id.into(),
            card_id: card_id.into(),
            qty: 1,
            card_name: card_name.into(),
            card_type_id: CardTypeId::default(),
            card_type_code: String::new(),
            card_type_name: String::new(),
            race_id: None,
            race_name: None,
            rarity_tier_id: None,
            rarity_name: None,
            legal_status: LegalStatus::Legal,
            edition_id: EditionId::default(),
            block_id: None,
            is_unique: false,
            has_ability: false,
            can_be_starting_gold: false,
            is_starting_gold: false,
            cost: None,
        }
    }

    /// Create a sentinel entry for a line upstream could not resolve.
    ///
    /// `label` is whatever the user typed, kept for the diagnostic.
    #[must_use]
    pub fn unresolved(label: impl Into<String>, qty: u32) -> Self {
        Self::new(PrintingId::default(), CardId::default(), label).with_qty(qty)
    }

    /// Check whether the line resolved to a catalog card.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.card_id.is_empty()
    }

    /// Set the quantity. Zero is clamped to one.
    #[must_use]
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty.max(1);
        self
    }

    #[must_use]
    pub fn with_card_type(
        mut self,
        id: impl Into<CardTypeId>,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.card_type_id = id.into();
        self.card_type_code = code.into();
        self.card_type_name = name.into();
        self
    }

    #[must_use]
    pub fn with_race(mut self, id: impl Into<RaceId>, name: impl Into<String>) -> Self {
        self.race_id = Some(id.into());
        self.race_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, id: impl Into<RarityId>, name: impl Into<String>) -> Self {
        self.rarity_tier_id = Some(id.into());
        self.rarity_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_edition(mut self, edition: impl Into<EditionId>) -> Self {
        self.edition_id = edition.into();
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: impl Into<BlockId>) -> Self {
        self.block_id = Some(block.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: LegalStatus) -> Self {
        self.legal_status = status;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    #[must_use]
    pub fn with_ability(mut self) -> Self {
        self.has_ability = true;
        self
    }

    /// Mark the card as eligible to be the starting gold.
    #[must_use]
    pub fn starting_gold_eligible(mut self) -> Self {
        self.can_be_starting_gold = true;
        self
    }

    /// Designate this line as the deck's starting gold.
    #[must_use]
    pub fn as_starting_gold(mut self) -> Self {
        self.is_starting_gold = true;
        self
    }

    /// Short human label: the card name, or the printing id if unnamed.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.card_name.is_empty() {
            self.card_printing_id.as_str()
        } else {
            &self.card_name
        }
    }
}
