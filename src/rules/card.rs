//! Per-card rules: copy limits and legal status.

use rustc_hash::FxHashMap;
use serde_json::json;

use crate::deck::{CardId, LegalStatus, PrintingId};

use super::message::{EntityRef, Severity};
use super::rule::{Rule, RuleContext, RuleFault, RuleOutput};

/// Copies of one card summed across every printing.
#[derive(Debug)]
struct CardTally<'a> {
    card_id: &'a CardId,
    name: &'a str,
    is_unique: bool,
    count: u64,
    printings: Vec<&'a PrintingId>,
}

/// Each card may appear at most its effective limit: the format override,
/// else 1 for unique cards, else the format default.
///
/// Copies aggregate by `card_id`, so different printings of the same card
/// share one limit.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyLimitRule;

impl CopyLimitRule {
    pub const ID: &'static str = "card.copy_limit";
}

impl Rule for CopyLimitRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        let mut out = RuleOutput::new();

        // First-appearance order keeps output stable for a given deck.
        let mut index: FxHashMap<&CardId, usize> = FxHashMap::default();
        let mut tallies: Vec<CardTally<'_>> = Vec::new();

        for (_, entry) in ctx.resolved() {
            let slot = *index.entry(&entry.card_id).or_insert_with(|| {
                tallies.push(CardTally {
                    card_id: &entry.card_id,
                    name: entry.label(),
                    is_unique: false,
                    count: 0,
                    printings: Vec::new(),
                });
                tallies.len() - 1
            });
            let tally = &mut tallies[slot];
            tally.count += u64::from(entry.qty);
            tally.is_unique |= entry.is_unique;
            if !tally.printings.contains(&&entry.card_printing_id) {
                tally.printings.push(&entry.card_printing_id);
            }
        }

        for tally in &tallies {
            let (limit, source) = ctx.config.effective_limit(tally.card_id, tally.is_unique);
            if tally.count <= u64::from(limit) {
                continue;
            }
            let excess = tally.count - u64::from(limit);
            out.push(
                self.message(
                    Severity::Block,
                    format!(
                        "\"{}\" appears {} times; at most {} allowed.",
                        tally.name, tally.count, limit
                    ),
                )
                .with_hint(format!("Remove {excess} copy(ies)."))
                .with_entity(EntityRef::Card(tally.card_id.clone()))
                .with_context(json!({
                    "limit": limit,
                    "count": tally.count,
                    "limit_source": source,
                    "printings": tally.printings,
                })),
            );
        }

        Ok(out)
    }
}

/// Banned cards block, discontinued cards get the format's chosen severity,
/// restricted cards are noted.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegalStatusRule;

impl LegalStatusRule {
    pub const ID: &'static str = "card.legal_status";
}

impl Rule for LegalStatusRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        let mut out = RuleOutput::new();

        for (_, entry) in ctx.resolved() {
            let (severity, text, hint) = match entry.legal_status {
                LegalStatus::Legal => continue,
                LegalStatus::Banned => (
                    Severity::Block,
                    format!("\"{}\" is banned.", entry.label()),
                    Some("Remove it from the deck."),
                ),
                LegalStatus::Discontinued => (
                    ctx.config.params.discontinued_severity.into(),
                    format!("\"{}\" is discontinued.", entry.label()),
                    Some("Consider replacing it with a supported card."),
                ),
                LegalStatus::Restricted => (
                    Severity::Info,
                    format!("\"{}\" is restricted.", entry.label()),
                    None,
                ),
            };

            let mut message = self
                .message(severity, text)
                .with_entity(EntityRef::Printing(entry.card_printing_id.clone()))
                .with_context(json!({ "status": entry.legal_status }));
            if let Some(hint) = hint {
                message = message.with_hint(hint);
            }
            out.push(message);
        }

        Ok(out)
    }
}
