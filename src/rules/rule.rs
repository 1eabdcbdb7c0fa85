//! The `Rule` trait and the context every rule evaluates against.
//!
//! ## Implementation Notes
//!
//! - `evaluate` must be pure: same context, same messages, same order
//! - Emit messages in deck-entry order
//! - Skip unresolved entries; `UnresolvedEntryRule` reports them
//! - Bump `version()` whenever the rule's semantics change

use smallvec::SmallVec;
use thiserror::Error;

use crate::deck::DeckEntry;
use crate::format::FormatConfig;

use super::message::{Severity, ValidationMessage};

/// Messages produced by one rule. Most rules emit zero to two.
pub type RuleOutput = SmallVec<[ValidationMessage; 2]>;

/// A rule could not complete.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuleFault {
    /// The rule met input it cannot judge.
    #[error("rule could not evaluate: {0}")]
    Invalid(String),
    /// The rule panicked.
    #[error("rule panicked: {0}")]
    Panicked(String),
}

/// Read-only input shared by every rule of one validation run.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    pub config: &'a FormatConfig,
    pub entries: &'a [DeckEntry],
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub fn new(config: &'a FormatConfig, entries: &'a [DeckEntry]) -> Self {
        Self { config, entries }
    }

    /// Total copies across all lines, resolved or not.
    #[must_use]
    pub fn total_cards(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.qty)).sum()
    }

    /// Resolved entries with their line index, in deck order.
    pub fn resolved(&self) -> impl Iterator<Item = (usize, &'a DeckEntry)> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_resolved())
    }
}

/// One independent deck check.
pub trait Rule: Send + Sync {
    /// Stable identifier, persisted with every message.
    fn id(&self) -> &'static str;

    /// Semantic version, persisted with every message.
    fn version(&self) -> u32 {
        1
    }

    /// Evaluate the rule against a deck.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault>;

    /// Start a message tagged with this rule's id and version.
    fn message(&self, severity: Severity, text: impl Into<String>) -> ValidationMessage
    where
        Self: Sized,
    {
        ValidationMessage::new(self.id(), self.version(), severity, text)
    }
}
