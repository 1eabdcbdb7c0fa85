//! Flat records for persisting validation runs.
//!
//! A run is stored as one `ValidationRunRecord` with its messages as an
//! ordered child collection. `sort_order` is the message's position in the
//! original result, so rows fetched in any order rebuild the same result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deck::FormatId;
use crate::rules::{EntityRef, Severity, ValidationMessage};
use crate::stats::ComputedStats;
use crate::validate::{Timing, ValidationResult};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to encode run record: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode run record: {0}")]
    Decode(#[source] bincode::Error),
    #[error("invalid context json at message {sort_order}: {source}")]
    ContextJson {
        sort_order: u32,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid entity reference at message {sort_order}: {kind}/{id}")]
    EntityRef {
        sort_order: u32,
        kind: String,
        id: String,
    },
}

/// One stored message row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub sort_order: u32,
    pub rule_id: String,
    pub rule_version: u32,
    pub severity: Severity,
    pub message: String,
    pub hint: Option<String>,
    pub entity_kind: Option<String>,
    pub entity_id: Option<String>,
    /// Context as JSON text.
    pub context_json: Option<String>,
}

impl MessageRecord {
    fn from_message(sort_order: u32, message: &ValidationMessage) -> Self {
        Self {
            sort_order,
            rule_id: message.rule_id.clone(),
            rule_version: message.rule_version,
            severity: message.severity,
            message: message.message.clone(),
            hint: message.hint.clone(),
            entity_kind: message.entity_ref.as_ref().map(|e| e.kind().to_string()),
            entity_id: message.entity_ref.as_ref().map(EntityRef::id_text),
            context_json: message.context_json.as_ref().map(|v| v.to_string()),
        }
    }

    fn into_message(self) -> Result<ValidationMessage, RecordError> {
        let entity_ref = match (self.entity_kind, self.entity_id) {
            (Some(kind), Some(id)) => Some(EntityRef::from_parts(&kind, &id).ok_or(
                RecordError::EntityRef {
                    sort_order: self.sort_order,
                    kind,
                    id,
                },
            )?),
            _ => None,
        };

        let context_json = self
            .context_json
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|source| RecordError::ContextJson {
                sort_order: self.sort_order,
                source,
            })?;

        Ok(ValidationMessage {
            rule_id: self.rule_id,
            rule_version: self.rule_version,
            severity: self.severity,
            message: self.message,
            hint: self.hint,
            entity_ref,
            context_json,
        })
    }
}

/// One stored validation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationRunRecord {
    /// Identifier generated by the persistence layer.
    pub run_id: String,
    pub format_id: FormatId,
    pub is_valid: bool,
    pub duration_ms: f64,
    pub computed_stats: ComputedStats,
    pub messages: Vec<MessageRecord>,
}

impl ValidationRunRecord {
    /// Flatten a result for storage.
    #[must_use]
    pub fn from_result(run_id: impl Into<String>, result: &ValidationResult) -> Self {
        let messages = result
            .messages
            .iter()
            .zip(0u32..)
            .map(|(message, sort_order)| MessageRecord::from_message(sort_order, message))
            .collect();

        Self {
            run_id: run_id.into(),
            format_id: result.format_id.clone(),
            is_valid: result.is_valid,
            duration_ms: result.timing.duration_ms,
            computed_stats: result.computed_stats.clone(),
            messages,
        }
    }

    /// Rebuild the original result, ordering messages by `sort_order`.
    pub fn into_result(mut self) -> Result<ValidationResult, RecordError> {
        self.messages.sort_by_key(|m| m.sort_order);
        let messages = self
            .messages
            .into_iter()
            .map(MessageRecord::into_message)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidationResult {
            format_id: self.format_id,
            is_valid: self.is_valid,
            messages,
            computed_stats: self.computed_stats,
            timing: Timing {
                duration_ms: self.duration_ms,
            },
        })
    }

    /// Compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        bincode::serialize(self).map_err(RecordError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        bincode::deserialize(bytes).map_err(RecordError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{CardId, DeckEntry, LegalStatus};
    use crate::format::FormatConfig;
    use crate::validate::assemble;

    fn sample_result() -> ValidationResult {
        let config = FormatConfig::new("f").with_card_limit("c1", 1);
        let entries = vec![
            DeckEntry::unresolved("???", 1),
            DeckEntry::new("p1", "c1", "Bolt").with_qty(2).with_cost(1),
            DeckEntry::new("p2", "c2", "Old").with_status(LegalStatus::Discontinued),
        ];
        assemble(&config, &entries)
    }

    #[test]
    fn test_sort_order_follows_messages() {
        let result = sample_result();
        let record = ValidationRunRecord::from_result("run-1", &result);

        assert_eq!(record.messages.len(), result.messages.len());
        for (i, row) in record.messages.iter().enumerate() {
            assert_eq!(row.sort_order as usize, i);
            assert_eq!(row.rule_id, result.messages[i].rule_id);
        }
    }

    #[test]
    fn test_round_trip_out_of_order_rows() {
        let result = sample_result();
        let mut record = ValidationRunRecord::from_result("run-1", &result);
        record.messages.reverse();

        let rebuilt = record.into_result().unwrap();
        assert_eq!(rebuilt, result);
    }

    #[test]
    fn test_entity_columns() {
        let result = sample_result();
        let record = ValidationRunRecord::from_result("run-1", &result);

        let copy_limit = record
            .messages
            .iter()
            .find(|m| m.rule_id == "card.copy_limit")
            .unwrap();
        assert_eq!(copy_limit.entity_kind.as_deref(), Some("card"));
        assert_eq!(copy_limit.entity_id.as_deref(), Some(CardId::new("c1").as_str()));
    }

    #[test]
    fn test_binary_snapshot() {
        let record = ValidationRunRecord::from_result("run-9", &sample_result());
        let bytes = record.to_bytes().unwrap();
        let decoded = ValidationRunRecord::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_corrupt_bytes() {
        let err = ValidationRunRecord::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, RecordError::Decode(_)));
    }

    #[test]
    fn test_bad_entity_kind() {
        let mut record = ValidationRunRecord::from_result("run-1", &sample_result());
        record.messages[0].entity_kind = Some("deck".into());

        let err = record.into_result().unwrap_err();
        assert!(matches!(err, RecordError::EntityRef { sort_order: 0, .. }));
    }

    #[test]
    fn test_bad_context_json() {
        let mut record = ValidationRunRecord::from_result("run-1", &sample_result());
        record.messages[1].context_json = Some("{not json".into());

        let err = record.into_result().unwrap_err();
        assert!(matches!(err, RecordError::ContextJson { sort_order: 1, .. }));
    }
}
