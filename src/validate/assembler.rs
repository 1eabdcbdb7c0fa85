//! Result assembler: the engine's entry point.
//!
//! `assemble()` is what both the live editor and the save path call. It is
//! pure apart from the timing measurement and debug logging, and safe to
//! call concurrently.

use std::time::Instant;

use crate::deck::{DeckEntry, FormatId};
use crate::format::{FormatConfig, FormatError, FormatSource};
use crate::rules::{RuleContext, RuleSet};
use crate::stats::aggregate;

use super::result::{Timing, ValidationResult};

/// Validate a deck against a format with the standard rules.
///
/// ## Example
///
/// ```
/// use ccg_deckcheck::deck::DeckEntry;
/// use ccg_deckcheck::format::{FormatConfig, FormatParams};
/// use ccg_deckcheck::validate::assemble;
///
/// let config = FormatConfig::new("mini").with_params(FormatParams::default().with_deck_size(2));
/// let entries = vec![
///     DeckEntry::new("g1", "c-gold", "Gold").starting_gold_eligible().as_starting_gold(),
///     DeckEntry::new("a1", "c-ally", "Squire").with_cost(1),
/// ];
///
/// let result = assemble(&config, &entries);
/// assert!(result.is_valid);
/// assert_eq!(result.computed_stats.total_cards, 2);
/// ```
#[must_use]
pub fn assemble(config: &FormatConfig, entries: &[DeckEntry]) -> ValidationResult {
    assemble_with(RuleSet::standard(), config, entries)
}

/// Validate a deck with a custom rule set.
#[must_use]
pub fn assemble_with(
    rules: &RuleSet,
    config: &FormatConfig,
    entries: &[DeckEntry],
) -> ValidationResult {
    let start = Instant::now();
    let span = tracing::debug_span!("assemble", format_id = %config.format_id);
    let _guard = span.enter();

    let computed_stats = aggregate(entries);
    let messages = rules.evaluate(&RuleContext::new(config, entries));

    let timing = Timing {
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    let result = ValidationResult::new(config.format_id.clone(), messages, computed_stats, timing);

    tracing::debug!(
        entries = entries.len(),
        total_cards = result.computed_stats.total_cards,
        messages = result.messages.len(),
        is_valid = result.is_valid,
        duration_ms = result.timing.duration_ms,
        "deck validated"
    );

    result
}

/// Resolve a format and validate a deck against it.
///
/// Resolution errors are returned before any rule runs.
pub fn validate_deck<S: FormatSource + ?Sized>(
    formats: &S,
    format_id: &FormatId,
    entries: &[DeckEntry],
) -> Result<ValidationResult, FormatError> {
    let config = formats.resolve(format_id)?;
    Ok(assemble(&config, entries))
}
