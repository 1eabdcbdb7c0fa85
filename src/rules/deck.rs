//! Whole-deck rules: unresolved lines, deck size, starting gold.

use rustc_hash::FxHashSet;
use serde_json::json;

use crate::deck::DeckEntry;

use super::message::{EntityRef, Severity};
use super::rule::{Rule, RuleContext, RuleFault, RuleOutput};

/// Reports lines upstream could not resolve to a catalog card.
///
/// Runs first. Every other rule skips these lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnresolvedEntryRule;

impl UnresolvedEntryRule {
    pub const ID: &'static str = "deck.unresolved_entry";
}

impl Rule for UnresolvedEntryRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        let mut out = RuleOutput::new();

        for (index, entry) in ctx.entries.iter().enumerate() {
            if entry.is_resolved() {
                continue;
            }
            out.push(
                self.message(
                    Severity::Block,
                    format!("Could not resolve \"{}\" to a catalog card.", entry.label()),
                )
                .with_hint("Choose a printing from the catalog or remove the line.")
                .with_entity(EntityRef::Line(index))
                .with_context(json!({
                    "line": index,
                    "label": entry.label(),
                    "qty": entry.qty,
                })),
            );
        }

        Ok(out)
    }
}

/// The deck must contain exactly `deck_size` cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeckSizeRule;

impl DeckSizeRule {
    pub const ID: &'static str = "deck.size";
}

impl Rule for DeckSizeRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        let mut out = RuleOutput::new();
        let expected = u64::from(ctx.config.params.deck_size);
        let actual = ctx.total_cards();

        if actual != expected {
            let hint = if actual < expected {
                format!("Add {} card(s).", expected - actual)
            } else {
                format!("Remove {} card(s).", actual - expected)
            };
            out.push(
                self.message(
                    Severity::Block,
                    format!("Deck has {actual} cards; the format requires exactly {expected}."),
                )
                .with_hint(hint)
                .with_context(json!({ "expected": expected, "actual": actual })),
            );
        }

        Ok(out)
    }
}

/// Exactly one eligible starting gold must be designated.
///
/// Designations are counted per distinct printing, so one line with
/// `qty = 2` and two repeated lines of the same printing are judged alike.
#[derive(Clone, Copy, Debug, Default)]
pub struct StartingGoldRule;

impl StartingGoldRule {
    pub const ID: &'static str = "deck.starting_gold";
}

impl Rule for StartingGoldRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        let mut out = RuleOutput::new();

        let mut seen = FxHashSet::default();
        let designated: Vec<&DeckEntry> = ctx
            .resolved()
            .map(|(_, entry)| entry)
            .filter(|entry| entry.is_starting_gold)
            .filter(|entry| seen.insert(entry.card_printing_id.clone()))
            .collect();

        match designated.len() {
            0 => out.push(
                self.message(Severity::Block, "No starting gold is designated.")
                    .with_hint("Mark one eligible gold as the starting gold."),
            ),
            1 => {}
            n => {
                let names: Vec<&str> = designated.iter().map(|e| e.label()).collect();
                out.push(
                    self.message(
                        Severity::Block,
                        format!("{n} starting golds are designated; exactly one is allowed."),
                    )
                    .with_hint("Keep a single starting gold.")
                    .with_context(json!({ "designated": names })),
                );
            }
        }

        for entry in designated.iter().filter(|e| !e.can_be_starting_gold) {
            out.push(
                self.message(
                    Severity::Block,
                    format!("\"{}\" cannot be used as the starting gold.", entry.label()),
                )
                .with_hint("Choose a gold that is eligible as starting gold.")
                .with_entity(EntityRef::Printing(entry.card_printing_id.clone())),
            );
        }

        Ok(out)
    }
}
