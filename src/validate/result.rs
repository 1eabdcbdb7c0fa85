//! The engine's output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deck::FormatId;
use crate::rules::{Severity, ValidationMessage};
use crate::stats::ComputedStats;

/// Wall-clock cost of one validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub duration_ms: f64,
}

/// Verdict, diagnostics and statistics for one deck against one format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Format the deck was checked against.
    pub format_id: FormatId,

    /// True iff no message has severity BLOCK.
    pub is_valid: bool,

    /// Messages in rule order, then deck-entry order.
    pub messages: Vec<ValidationMessage>,

    pub computed_stats: ComputedStats,

    pub timing: Timing,
}

impl ValidationResult {
    /// Build a result, deriving `is_valid` from the messages.
    #[must_use]
    pub fn new(
        format_id: FormatId,
        messages: Vec<ValidationMessage>,
        computed_stats: ComputedStats,
        timing: Timing,
    ) -> Self {
        let is_valid = !messages.iter().any(ValidationMessage::is_blocking);
        Self {
            format_id,
            is_valid,
            messages,
            computed_stats,
            timing,
        }
    }

    /// Messages of one severity, in order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationMessage> {
        self.messages.iter().filter(move |m| m.severity == severity)
    }

    /// BLOCK messages.
    pub fn blocking(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.with_severity(Severity::Block)
    }

    /// WARN messages.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.with_severity(Severity::Warn)
    }

    /// Messages emitted by one rule.
    pub fn for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a ValidationMessage> {
        self.messages.iter().filter(move |m| m.rule_id == rule_id)
    }

    /// Messages grouped by severity, most severe first. Order within a
    /// group is preserved.
    #[must_use]
    pub fn by_severity(&self) -> BTreeMap<Severity, Vec<&ValidationMessage>> {
        let mut groups: BTreeMap<Severity, Vec<&ValidationMessage>> = BTreeMap::new();
        for message in &self.messages {
            groups.entry(message.severity).or_default().push(message);
        }
        groups
    }

    /// Compare everything except timing.
    #[must_use]
    pub fn same_verdict(&self, other: &Self) -> bool {
        self.format_id == other.format_id
            && self.is_valid == other.is_valid
            && self.messages == other.messages
            && self.computed_stats == other.computed_stats
    }
}
