//! Property tests for determinism and order independence.

use std::collections::BTreeSet;

use proptest::prelude::*;

use ccg_deckcheck::deck::{DeckEntry, LegalStatus};
use ccg_deckcheck::format::{FormatConfig, FormatParams};
use ccg_deckcheck::rules::EntityRef;
use ccg_deckcheck::validate::assemble;
use ccg_deckcheck::ValidationResult;

fn status() -> impl Strategy<Value = LegalStatus> {
    prop_oneof![
        6 => Just(LegalStatus::Legal),
        1 => Just(LegalStatus::Restricted),
        1 => Just(LegalStatus::Banned),
        1 => Just(LegalStatus::Discontinued),
    ]
}

/// Small id spaces so decks collide on cards, printings and races.
fn entry() -> impl Strategy<Value = DeckEntry> {
    (
        0u8..4,
        0u8..2,
        1u32..4,
        status(),
        proptest::option::of(0u8..3),
        proptest::option::of(0i32..6),
        0u8..3,
        any::<bool>(),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.05),
    )
        .prop_map(
            |(card, printing, qty, status, race, cost, edition, unique, gold, unresolved)| {
                if unresolved {
                    return DeckEntry::unresolved(format!("line-{card}"), qty);
                }
                let mut e = DeckEntry::new(
                    format!("p-{card}-{printing}"),
                    format!("c-{card}"),
                    format!("Card {card}"),
                )
                .with_card_type(format!("t-{}", card % 2), "T", format!("Type {}", card % 2))
                .with_edition(format!("e-{edition}"))
                .with_block("b-0")
                .with_status(status)
                .with_qty(qty);
                if let Some(r) = race {
                    e = e.with_race(format!("r-{r}"), format!("Race {r}"));
                }
                if let Some(c) = cost {
                    e = e.with_cost(c);
                }
                if unique {
                    e = e.unique();
                }
                if gold {
                    e = e.starting_gold_eligible().as_starting_gold();
                }
                e
            },
        )
}

fn config() -> FormatConfig {
    FormatConfig::new("prop")
        .with_params(FormatParams::default().with_deck_size(8).with_single_race())
        .with_allowed_editions(["e-0".into(), "e-1".into()])
        .with_allowed_races(["r-0".into(), "r-1".into()])
        .with_card_limit("c-3", 1)
}

fn blocking_rules(result: &ValidationResult) -> BTreeSet<String> {
    result.blocking().map(|m| m.rule_id.clone()).collect()
}

/// Sorted `(rule, severity, entity)` triples. Line positions move under
/// permutation, so line refs keep only their kind.
fn message_targets(result: &ValidationResult) -> Vec<(String, String, String)> {
    let mut targets: Vec<_> = result
        .messages
        .iter()
        .map(|m| {
            let entity = match &m.entity_ref {
                Some(EntityRef::Line(_)) => "line".to_string(),
                Some(other) => format!("{}:{}", other.kind(), other.id_text()),
                None => String::new(),
            };
            (m.rule_id.clone(), m.severity.label().to_string(), entity)
        })
        .collect();
    targets.sort();
    targets
}

/// Split every entry into `qty` single-copy entries.
fn split(entries: &[DeckEntry]) -> Vec<DeckEntry> {
    entries
        .iter()
        .flat_map(|e| (0..e.qty).map(move |_| e.clone().with_qty(1)))
        .collect()
}

proptest! {
    #[test]
    fn prop_assemble_is_deterministic(entries in prop::collection::vec(entry(), 0..12)) {
        let cfg = config();
        let a = assemble(&cfg, &entries);
        let b = assemble(&cfg, &entries);

        prop_assert!(a.same_verdict(&b));
        prop_assert_eq!(
            serde_json::to_string(&a.messages).unwrap(),
            serde_json::to_string(&b.messages).unwrap()
        );
    }

    #[test]
    fn prop_permutation_keeps_verdict(
        (entries, shuffled) in prop::collection::vec(entry(), 0..12)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let cfg = config();
        let a = assemble(&cfg, &entries);
        let b = assemble(&cfg, &shuffled);

        prop_assert_eq!(a.is_valid, b.is_valid);
        prop_assert_eq!(&a.computed_stats, &b.computed_stats);
        prop_assert_eq!(blocking_rules(&a), blocking_rules(&b));
        prop_assert_eq!(message_targets(&a), message_targets(&b));
    }

    #[test]
    fn prop_split_entries_keep_verdict(entries in prop::collection::vec(entry(), 0..10)) {
        let cfg = config();
        let a = assemble(&cfg, &entries);
        let b = assemble(&cfg, &split(&entries));

        prop_assert_eq!(a.is_valid, b.is_valid);
        prop_assert_eq!(&a.computed_stats, &b.computed_stats);
        prop_assert_eq!(blocking_rules(&a), blocking_rules(&b));
    }

    #[test]
    fn prop_validity_matches_blocks(entries in prop::collection::vec(entry(), 0..12)) {
        let result = assemble(&config(), &entries);
        prop_assert_eq!(result.is_valid, result.blocking().next().is_none());
        prop_assert_eq!(
            result.computed_stats.total_cards,
            entries.iter().map(|e| u64::from(e.qty)).sum::<u64>()
        );
    }
}
