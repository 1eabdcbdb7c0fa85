//! Resolved format configuration.
//!
//! A `FormatConfig` is the flat, query-ready view of one format:
//! - `FormatParams`: deck size, default copy limit, discontinued severity
//! - Four `AllowList`s: blocks, editions, card types, races
//! - Card limit overrides keyed by `CardId`
//!
//! Collections are persistent (`im`) so a cached config can be cloned into
//! every live validation for free.

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};

use crate::deck::{BlockId, CardId, CardTypeId, EditionId, FormatId, RaceId};
use crate::rules::Severity;

/// Severity to report for discontinued cards. Only the two severities a
/// format may choose are representable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscontinuedSeverity {
    #[default]
    Warn,
    Block,
}

impl From<DiscontinuedSeverity> for Severity {
    fn from(s: DiscontinuedSeverity) -> Self {
        match s {
            DiscontinuedSeverity::Warn => Severity::Warn,
            DiscontinuedSeverity::Block => Severity::Block,
        }
    }
}

/// Numeric and flag parameters of a format.
///
/// Deserializes from a stored parameter blob; omitted fields take the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatParams {
    /// Exact number of cards a deck must contain (default 50).
    pub deck_size: u32,

    /// Maximum copies of a non-unique card without an override (default 3).
    pub default_card_limit: u32,

    /// Severity for discontinued cards (default WARN).
    pub discontinued_severity: DiscontinuedSeverity,

    /// All races in the deck must be the same (default false).
    pub single_race: bool,
}

impl Default for FormatParams {
    fn default() -> Self {
        Self {
            deck_size: 50,
            default_card_limit: 3,
            discontinued_severity: DiscontinuedSeverity::Warn,
            single_race: false,
        }
    }
}

impl FormatParams {
    #[must_use]
    pub fn with_deck_size(mut self, size: u32) -> Self {
        self.deck_size = size;
        self
    }

    #[must_use]
    pub fn with_default_card_limit(mut self, limit: u32) -> Self {
        self.default_card_limit = limit;
        self
    }

    #[must_use]
    pub fn with_discontinued_severity(mut self, severity: DiscontinuedSeverity) -> Self {
        self.discontinued_severity = severity;
        self
    }

    #[must_use]
    pub fn with_single_race(mut self) -> Self {
        self.single_race = true;
        self
    }
}

/// Set of allowed values for one format dimension.
///
/// An empty list places no restriction on the dimension: every value,
/// including a missing one, is permitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList<T: Ord + Clone>(OrdSet<T>);

impl<T: Ord + Clone> Default for AllowList<T> {
    fn default() -> Self {
        Self(OrdSet::new())
    }
}

impl<T: Ord + Clone> AllowList<T> {
    /// An allow-list that restricts nothing.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Check whether this list restricts nothing.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether a value is allowed.
    #[must_use]
    pub fn permits(&self, value: &T) -> bool {
        self.is_unrestricted() || self.0.contains(value)
    }

    /// Check an optional value. A missing value is only allowed when the
    /// list is unrestricted.
    #[must_use]
    pub fn permits_opt(&self, value: Option<&T>) -> bool {
        match value {
            Some(v) => self.permits(v),
            None => self.is_unrestricted(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate allowed values in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Add a value.
    pub fn insert(&mut self, value: T) {
        self.0.insert(value);
    }
}

impl<T: Ord + Clone> FromIterator<T> for AllowList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where an effective copy limit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSource {
    /// Explicit per-card override in the format.
    Override,
    /// The card is unique.
    Unique,
    /// The format's default card limit.
    Default,
}

/// Complete configuration of one format, immutable during a validation.
///
/// ## Example
///
/// ```
/// use ccg_deckcheck::format::{FormatConfig, FormatParams};
///
/// let config = FormatConfig::new("block-one")
///     .with_params(FormatParams::default().with_deck_size(40))
///     .with_allowed_races(["r-dragon", "r-titan"].map(Into::into))
///     .with_card_limit("c-bolt", 1);
///
/// assert_eq!(config.params.deck_size, 40);
/// assert!(config.allowed_race_ids.permits(&"r-dragon".into()));
/// assert!(config.allowed_edition_ids.is_unrestricted());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    pub format_id: FormatId,
    pub params: FormatParams,
    #[serde(default)]
    pub allowed_block_ids: AllowList<BlockId>,
    #[serde(default)]
    pub allowed_edition_ids: AllowList<EditionId>,
    #[serde(default)]
    pub allowed_card_type_ids: AllowList<CardTypeId>,
    #[serde(default)]
    pub allowed_race_ids: AllowList<RaceId>,
    /// Maximum copies per card, overriding the default and unique limits.
    #[serde(default)]
    pub card_limits: OrdMap<CardId, u32>,
}

impl FormatConfig {
    /// Create an unrestricted config with default parameters.
    #[must_use]
    pub fn new(format_id: impl Into<FormatId>) -> Self {
        Self {
            format_id: format_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: FormatParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_allowed_blocks(mut self, ids: impl IntoIterator<Item = BlockId>) -> Self {
        self.allowed_block_ids = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_allowed_editions(mut self, ids: impl IntoIterator<Item = EditionId>) -> Self {
        self.allowed_edition_ids = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_allowed_card_types(mut self, ids: impl IntoIterator<Item = CardTypeId>) -> Self {
        self.allowed_card_type_ids = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_allowed_races(mut self, ids: impl IntoIterator<Item = RaceId>) -> Self {
        self.allowed_race_ids = ids.into_iter().collect();
        self
    }

    /// Add a per-card copy limit override.
    #[must_use]
    pub fn with_card_limit(mut self, card: impl Into<CardId>, max_copies: u32) -> Self {
        self.card_limits.insert(card.into(), max_copies);
        self
    }

    /// Effective maximum copies for a card: override, else 1 when unique,
    /// else the default limit.
    #[must_use]
    pub fn effective_limit(&self, card: &CardId, is_unique: bool) -> (u32, LimitSource) {
        if let Some(&limit) = self.card_limits.get(card) {
            (limit, LimitSource::Override)
        } else if is_unique {
            (1, LimitSource::Unique)
        } else {
            (self.params.default_card_limit, LimitSource::Default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = FormatParams::default();
        assert_eq!(params.deck_size, 50);
        assert_eq!(params.default_card_limit, 3);
        assert_eq!(params.discontinued_severity, DiscontinuedSeverity::Warn);
        assert!(!params.single_race);
    }

    #[test]
    fn test_params_from_partial_blob() {
        let params: FormatParams =
            serde_json::from_str(r#"{"deck_size": 40, "discontinued_severity": "BLOCK"}"#).unwrap();
        assert_eq!(params.deck_size, 40);
        assert_eq!(params.default_card_limit, 3);
        assert_eq!(params.discontinued_severity, DiscontinuedSeverity::Block);
    }

    #[test]
    fn test_params_reject_info_severity() {
        let parsed: Result<FormatParams, _> =
            serde_json::from_str(r#"{"discontinued_severity": "INFO"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_allow_list_permits_everything() {
        let list: AllowList<RaceId> = AllowList::unrestricted();
        assert!(list.permits(&RaceId::new("anything")));
        assert!(list.permits_opt(None));
    }

    #[test]
    fn test_non_empty_allow_list() {
        let list: AllowList<RaceId> = [RaceId::new("a"), RaceId::new("b")].into_iter().collect();
        assert!(list.permits(&RaceId::new("a")));
        assert!(!list.permits(&RaceId::new("c")));
        assert!(!list.permits_opt(None));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_effective_limit_precedence() {
        let config = FormatConfig::new("f")
            .with_params(FormatParams::default().with_default_card_limit(3))
            .with_card_limit("c-override", 2)
            .with_card_limit("c-unique-override", 4);

        assert_eq!(
            config.effective_limit(&"c-override".into(), false),
            (2, LimitSource::Override)
        );
        assert_eq!(
            config.effective_limit(&"c-unique-override".into(), true),
            (4, LimitSource::Override)
        );
        assert_eq!(
            config.effective_limit(&"c-unique".into(), true),
            (1, LimitSource::Unique)
        );
        assert_eq!(
            config.effective_limit(&"c-plain".into(), false),
            (3, LimitSource::Default)
        );
    }

    #[test]
    fn test_config_clone_shares_structure() {
        let config = FormatConfig::new("f").with_allowed_editions(["e1", "e2"].map(Into::into));
        let copy = config.clone();
        assert_eq!(config, copy);
    }

    #[test]
    fn test_config_serialization() {
        let config = FormatConfig::new("f")
            .with_allowed_blocks([BlockId::new("b2"), BlockId::new("b1")])
            .with_card_limit("c1", 1);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""allowed_block_ids":["b1","b2"]"#));

        let back: FormatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
