//! Format allow-list rules: block, edition, card type, race.
//!
//! Each dimension is its own rule so historical results can tell them
//! apart. An unrestricted (empty) allow-list disables its rule.

use std::collections::BTreeMap;

use serde_json::json;

use crate::deck::{DeckEntry, RaceId};
use crate::format::AllowList;

use super::message::{EntityRef, Severity};
use super::rule::{Rule, RuleContext, RuleFault, RuleOutput};

/// BLOCK every resolved entry whose value is not in `list`.
///
/// `value` returns `None` when the entry has no value for the dimension;
/// such entries are blocked unless `skip_missing` is set.
fn allow_list_violations<R, T, F>(
    rule: &R,
    ctx: &RuleContext<'_>,
    dimension: &str,
    list: &AllowList<T>,
    skip_missing: bool,
    value: F,
) -> RuleOutput
where
    R: Rule,
    T: Ord + Clone + AsRef<str> + serde::Serialize,
    F: Fn(&DeckEntry) -> Option<&T>,
{
    let mut out = RuleOutput::new();
    if list.is_unrestricted() {
        return out;
    }

    for (_, entry) in ctx.resolved() {
        let found = value(entry);
        if found.is_none() && skip_missing {
            continue;
        }
        if list.permits_opt(found) {
            continue;
        }

        let text = match found {
            Some(v) => format!(
                "\"{}\" is not allowed in this format ({dimension} {}).",
                entry.label(),
                v.as_ref()
            ),
            None => format!(
                "\"{}\" is not allowed in this format (no {dimension}).",
                entry.label()
            ),
        };
        out.push(
            rule.message(Severity::Block, text)
                .with_hint(format!("Replace it with a card from an allowed {dimension}."))
                .with_entity(EntityRef::Printing(entry.card_printing_id.clone()))
                .with_context(json!({
                    "dimension": dimension,
                    "value": found,
                    "allowed": list.len(),
                })),
        );
    }

    out
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllowedBlockRule;

impl AllowedBlockRule {
    pub const ID: &'static str = "format.block";
}

impl Rule for AllowedBlockRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    /// Editions outside every block fail a restricted block list.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        Ok(allow_list_violations(
            self,
            ctx,
            "block",
            &ctx.config.allowed_block_ids,
            false,
            |e| e.block_id.as_ref(),
        ))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllowedEditionRule;

impl AllowedEditionRule {
    pub const ID: &'static str = "format.edition";
}

impl Rule for AllowedEditionRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        Ok(allow_list_violations(
            self,
            ctx,
            "edition",
            &ctx.config.allowed_edition_ids,
            false,
            |e| Some(&e.edition_id),
        ))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllowedCardTypeRule;

impl AllowedCardTypeRule {
    pub const ID: &'static str = "format.card_type";
}

impl Rule for AllowedCardTypeRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        Ok(allow_list_violations(
            self,
            ctx,
            "card type",
            &ctx.config.allowed_card_type_ids,
            false,
            |e| Some(&e.card_type_id),
        ))
    }
}

/// Cards without a race (golds, totems, ...) are never blocked here.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowedRaceRule;

impl AllowedRaceRule {
    pub const ID: &'static str = "format.race";
}

impl Rule for AllowedRaceRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        Ok(allow_list_violations(
            self,
            ctx,
            "race",
            &ctx.config.allowed_race_ids,
            true,
            |e| e.race_id.as_ref(),
        ))
    }
}

/// Racial formats: every card with a race must share the deck's race.
///
/// The deck's race is the one with the most copies, ties going to the
/// smallest `RaceId`, so the verdict does not depend on line order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleRaceRule;

impl SingleRaceRule {
    pub const ID: &'static str = "format.single_race";
}

/// Copies per race, with the smallest display name seen for it.
fn race_tally<'a>(ctx: &RuleContext<'a>) -> BTreeMap<&'a RaceId, (u64, &'a str)> {
    let mut tally: BTreeMap<&RaceId, (u64, &str)> = BTreeMap::new();
    for (_, entry) in ctx.resolved() {
        let Some(race) = entry.race_id.as_ref() else {
            continue;
        };
        let name = entry.race_name.as_deref().unwrap_or(race.as_str());
        let slot = tally.entry(race).or_insert((0, name));
        slot.0 += u64::from(entry.qty);
        slot.1 = slot.1.min(name);
    }
    tally
}

impl Rule for SingleRaceRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
        let mut out = RuleOutput::new();
        if !ctx.config.params.single_race {
            return Ok(out);
        }

        let tally = race_tally(ctx);
        if tally.len() < 2 {
            return Ok(out);
        }

        // Ascending key order: strict `>` keeps the smallest id on ties.
        let mut main: Option<(&RaceId, u64, &str)> = None;
        for (&race, &(copies, name)) in &tally {
            if main.map_or(true, |(_, best, _)| copies > best) {
                main = Some((race, copies, name));
            }
        }
        let Some((expected, _, expected_name)) = main else {
            return Ok(out);
        };

        for (_, entry) in ctx.resolved() {
            let Some(race) = entry.race_id.as_ref() else {
                continue;
            };
            if race == expected {
                continue;
            }
            let name = entry.race_name.as_deref().unwrap_or(race.as_str());

            out.push(
                self.message(
                    Severity::Block,
                    format!(
                        "\"{}\" is {name}, but this deck's race is {expected_name}.",
                        entry.label()
                    ),
                )
                .with_hint("Racial formats allow a single race.")
                .with_entity(EntityRef::Printing(entry.card_printing_id.clone()))
                .with_context(json!({
                    "expected_race": expected,
                    "found_race": race,
                    "races": tally.len(),
                })),
            );
        }

        Ok(out)
    }
}
