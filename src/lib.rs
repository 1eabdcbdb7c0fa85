//! # ccg-deckcheck
//!
//! Format-aware deck validation for trading card games.
//!
//! Given a format's rule configuration and a fully resolved list of deck
//! entries, the engine produces one deterministic verdict: a validity flag,
//! ordered severity-tagged diagnostics, and deck statistics.
//!
//! ## Design Principles
//!
//! 1. **Pure**: No I/O, no shared mutable state. The same call runs in an
//!    interactive editor and on the server after every save.
//!
//! 2. **Deterministic**: Rules run in a fixed order and emit messages in
//!    deck order, so identical input gives identical output.
//!
//! 3. **Resolved Input**: The engine never looks anything up. Lines upstream
//!    failed to resolve arrive as sentinel entries and become diagnostics.
//!
//! ## Modules
//!
//! - `deck`: Catalog identifiers and resolved deck entries
//! - `format`: Format definitions, resolver, flat `FormatConfig`
//! - `rules`: Rule trait, standard rules, ordered `RuleSet`
//! - `stats`: Cost histogram and type/race/rarity distributions
//! - `validate`: `assemble()`, the engine's entry point
//! - `record`: Flat persistence records for validation runs
//! - `session`: Debounce and stale-result handling for live editors

pub mod deck;
pub mod format;
pub mod rules;
pub mod stats;
pub mod validate;
pub mod record;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::deck::{
    BlockId, CardId, CardTypeId, DeckEntry, EditionId, FormatId, LegalStatus, PrintingId,
    RaceId, RarityId,
};

pub use crate::format::{
    AllowList, DiscontinuedSeverity, FormatConfig, FormatDefinition, FormatError, FormatParams,
    FormatSource, InMemoryFormats,
};

pub use crate::rules::{
    EntityRef, Rule, RuleContext, RuleFault, RuleOutput, RuleSet, Severity, ValidationMessage,
};

pub use crate::stats::{aggregate, ComputedStats};

pub use crate::validate::{assemble, assemble_with, validate_deck, Timing, ValidationResult};

pub use crate::record::{MessageRecord, RecordError, ValidationRunRecord};

pub use crate::session::{Completion, EvaluationTicket, LiveSession, SessionConfig};
