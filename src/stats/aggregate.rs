//! Deck statistics: cost histogram and type/race/rarity distributions.
//!
//! Statistics ignore legality. Every entry counts `qty` times.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deck::DeckEntry;

/// Histogram bucket for entries without a cost.
pub const NO_COST_BUCKET: &str = "N/A";

/// Aggregate statistics over a deck.
///
/// Maps are sorted by key so serialized output is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedStats {
    /// Sum of `qty` over every entry.
    pub total_cards: u64,

    /// Copies per cost; key is the cost as text or `"N/A"`.
    pub cost_histogram: BTreeMap<String, u64>,

    /// Copies per card type name.
    pub type_distribution: BTreeMap<String, u64>,

    /// Copies per race name. Entries without a race are not counted.
    pub race_distribution: BTreeMap<String, u64>,

    /// Copies per rarity name. Entries without a rarity are not counted.
    pub rarity_distribution: BTreeMap<String, u64>,
}

impl ComputedStats {
    /// Histogram buckets in display order: numeric ascending, `"N/A"` last.
    #[must_use]
    pub fn cost_curve(&self) -> Vec<(&str, u64)> {
        let mut buckets: Vec<(&str, u64)> = self
            .cost_histogram
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        buckets.sort_by_key(|(key, _)| match key.parse::<i64>() {
            Ok(cost) => (0, cost),
            Err(_) => (1, 0),
        });
        buckets
    }

    /// Average cost over copies that have a cost.
    #[must_use]
    pub fn average_cost(&self) -> Option<f64> {
        let (sum, count) = self
            .cost_histogram
            .iter()
            .filter_map(|(k, v)| k.parse::<i64>().ok().map(|cost| (cost, *v)))
            .fold((0i64, 0u64), |(sum, count), (cost, n)| {
                (sum + cost * n as i64, count + n)
            });
        if count == 0 {
            None
        } else {
            Some(sum as f64 / count as f64)
        }
    }
}

/// Fold entries into statistics.
///
/// Unresolved entries count toward `total_cards` and the `"N/A"` cost
/// bucket but carry no classification for the distributions.
#[must_use]
pub fn aggregate(entries: &[DeckEntry]) -> ComputedStats {
    let mut stats = ComputedStats::default();

    for entry in entries {
        let qty = u64::from(entry.qty);
        stats.total_cards += qty;

        let bucket = entry
            .cost
            .map_or_else(|| NO_COST_BUCKET.to_string(), |c| c.to_string());
        *stats.cost_histogram.entry(bucket).or_default() += qty;

        if !entry.is_resolved() {
            continue;
        }

        *stats
            .type_distribution
            .entry(entry.card_type_name.clone())
            .or_default() += qty;

        if let Some(race) = &entry.race_name {
            *stats.race_distribution.entry(race.clone()).or_default() += qty;
        }
        if let Some(rarity) = &entry.rarity_name {
            *stats.rarity_distribution.entry(rarity.clone()).or_default() += qty;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(printing: &str, cost: Option<i32>) -> DeckEntry {
        let e = DeckEntry::new(printing, format!("c-{printing}"), printing)
            .with_card_type("t-ally", "ALLY", "Ally");
        match cost {
            Some(c) => e.with_cost(c),
            None => e,
        }
    }

    #[test]
    fn test_histogram_bucketing() {
        let entries = vec![entry("a", Some(2)), entry("b", Some(2)), entry("c", None)];
        let stats = aggregate(&entries);

        let expected: BTreeMap<String, u64> =
            [("2".to_string(), 2), ("N/A".to_string(), 1)].into_iter().collect();
        assert_eq!(stats.cost_histogram, expected);
        assert_eq!(stats.total_cards, 3);
    }

    #[test]
    fn test_qty_expansion() {
        let entries = vec![
            entry("a", Some(1)).with_qty(3).with_race("r1", "Dragon"),
            entry("b", Some(1)).with_race("r1", "Dragon").with_rarity("rr", "Rare"),
        ];
        let stats = aggregate(&entries);

        assert_eq!(stats.total_cards, 4);
        assert_eq!(stats.cost_histogram["1"], 4);
        assert_eq!(stats.type_distribution["Ally"], 4);
        assert_eq!(stats.race_distribution["Dragon"], 4);
        assert_eq!(stats.rarity_distribution["Rare"], 1);
    }

    #[test]
    fn test_null_race_and_rarity_excluded() {
        let entries = vec![entry("a", Some(1)), entry("b", None)];
        let stats = aggregate(&entries);

        assert!(stats.race_distribution.is_empty());
        assert!(stats.rarity_distribution.is_empty());
        assert_eq!(stats.type_distribution["Ally"], 2);
    }

    #[test]
    fn test_unresolved_counts_toward_totals_only() {
        let entries = vec![DeckEntry::unresolved("???", 2)];
        let stats = aggregate(&entries);

        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.cost_histogram[NO_COST_BUCKET], 2);
        assert!(stats.type_distribution.is_empty());
    }

    #[test]
    fn test_cost_curve_order() {
        let entries = vec![
            entry("a", Some(10)),
            entry("b", None),
            entry("c", Some(2)),
            entry("d", Some(0)),
        ];
        let stats = aggregate(&entries);

        let keys: Vec<_> = stats.cost_curve().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["0", "2", "10", "N/A"]);
    }

    #[test]
    fn test_average_cost() {
        let entries = vec![entry("a", Some(1)).with_qty(2), entry("b", Some(4)), entry("c", None)];
        let stats = aggregate(&entries);
        assert_eq!(stats.average_cost(), Some(2.0));

        assert_eq!(aggregate(&[]).average_cost(), None);
    }

    #[test]
    fn test_empty_deck() {
        let stats = aggregate(&[]);
        assert_eq!(stats, ComputedStats::default());
    }
}
