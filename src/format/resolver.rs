//! Format configuration resolver.
//!
//! Turns a stored `FormatDefinition` (parameter blob, four allow-list
//! tables, card limit table) into a flat `FormatConfig`. The resolver holds
//! no legality logic; all of that lives in the rules.
//!
//! Storage is behind the `FormatSource` trait. `InMemoryFormats` is the
//! in-process implementation used by tests and live editors.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deck::{BlockId, CardId, CardTypeId, EditionId, FormatId, RaceId};

use super::config::{FormatConfig, FormatParams};

/// Errors raised while resolving a format. All of them are fatal to the
/// validation attempt.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format not found: {0}")]
    NotFound(FormatId),
    #[error("invalid parameters for {format_id}: {source}")]
    InvalidParams {
        format_id: FormatId,
        #[source]
        source: serde_json::Error,
    },
    #[error("deck size for {0} must be greater than zero")]
    InvalidDeckSize(FormatId),
}

/// One row of the card limit override table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLimitRow {
    pub card_id: CardId,
    pub max_copies: u32,
}

/// A format as stored upstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatDefinition {
    pub id: FormatId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Parameter blob. Missing keys take defaults; `null` means "all defaults".
    #[serde(default)]
    pub params: serde_json::Value,

    #[serde(default)]
    pub blocks: Vec<BlockId>,
    #[serde(default)]
    pub editions: Vec<EditionId>,
    #[serde(default)]
    pub card_types: Vec<CardTypeId>,
    #[serde(default)]
    pub races: Vec<RaceId>,
    #[serde(default)]
    pub card_limits: Vec<CardLimitRow>,
}

impl FormatDefinition {
    /// Create a definition with no parameters and no restrictions.
    #[must_use]
    pub fn new(id: impl Into<FormatId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_blocks(mut self, ids: impl IntoIterator<Item = BlockId>) -> Self {
        self.blocks.extend(ids);
        self
    }

    #[must_use]
    pub fn with_editions(mut self, ids: impl IntoIterator<Item = EditionId>) -> Self {
        self.editions.extend(ids);
        self
    }

    #[must_use]
    pub fn with_card_types(mut self, ids: impl IntoIterator<Item = CardTypeId>) -> Self {
        self.card_types.extend(ids);
        self
    }

    #[must_use]
    pub fn with_races(mut self, ids: impl IntoIterator<Item = RaceId>) -> Self {
        self.races.extend(ids);
        self
    }

    #[must_use]
    pub fn with_card_limit(mut self, card_id: impl Into<CardId>, max_copies: u32) -> Self {
        self.card_limits.push(CardLimitRow {
            card_id: card_id.into(),
            max_copies,
        });
        self
    }

    /// Merge the stored tables into a flat config.
    ///
    /// When the limit table lists a card twice, the last row wins.
    pub fn to_config(&self) -> Result<FormatConfig, FormatError> {
        let params = if self.params.is_null() {
            FormatParams::default()
        } else {
            FormatParams::deserialize(&self.params).map_err(|source| {
                FormatError::InvalidParams {
                    format_id: self.id.clone(),
                    source,
                }
            })?
        };

        if params.deck_size == 0 {
            return Err(FormatError::InvalidDeckSize(self.id.clone()));
        }

        let mut config = FormatConfig::new(self.id.clone())
            .with_params(params)
            .with_allowed_blocks(self.blocks.iter().cloned())
            .with_allowed_editions(self.editions.iter().cloned())
            .with_allowed_card_types(self.card_types.iter().cloned())
            .with_allowed_races(self.races.iter().cloned());

        for row in &self.card_limits {
            config = config.with_card_limit(row.card_id.clone(), row.max_copies);
        }

        Ok(config)
    }
}

/// Storage seam for format definitions.
pub trait FormatSource {
    /// Look up a stored format. `None` if it does not exist.
    fn definition(&self, id: &FormatId) -> Option<FormatDefinition>;

    /// Resolve a format into a flat config.
    fn resolve(&self, id: &FormatId) -> Result<FormatConfig, FormatError> {
        let definition = self
            .definition(id)
            .ok_or_else(|| FormatError::NotFound(id.clone()))?;
        let config = definition.to_config()?;

        tracing::debug!(
            format_id = %id,
            deck_size = config.params.deck_size,
            card_limits = config.card_limits.len(),
            "resolved format"
        );

        Ok(config)
    }
}

/// Format definitions held in memory.
///
/// ## Example
///
/// ```
/// use ccg_deckcheck::format::{FormatDefinition, FormatSource, InMemoryFormats};
///
/// let mut formats = InMemoryFormats::new();
/// formats.insert(FormatDefinition::new("classic", "Classic"));
///
/// let config = formats.resolve(&"classic".into()).unwrap();
/// assert_eq!(config.params.deck_size, 50);
/// assert!(formats.resolve(&"missing".into()).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryFormats {
    formats: FxHashMap<FormatId, FormatDefinition>,
}

impl InMemoryFormats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, definition: FormatDefinition) -> Option<FormatDefinition> {
        self.formats.insert(definition.id.clone(), definition)
    }

    #[must_use]
    pub fn contains(&self, id: &FormatId) -> bool {
        self.formats.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl FromIterator<FormatDefinition> for InMemoryFormats {
    fn from_iter<I: IntoIterator<Item = FormatDefinition>>(iter: I) -> Self {
        let mut formats = Self::new();
        for definition in iter {
            formats.insert(definition);
        }
        formats
    }
}

impl FormatSource for InMemoryFormats {
    fn definition(&self, id: &FormatId) -> Option<FormatDefinition> {
        self.formats.get(id).cloned()
    }
}
