//! Ordered rule registry.
//!
//! A `RuleSet` fixes which rules run and in what order. Message order in a
//! `ValidationResult` is the registration order here, then deck-entry order
//! within each rule.
//!
//! ## Standard Order
//!
//! 1. `deck.unresolved_entry`
//! 2. `deck.size`
//! 3. `deck.starting_gold`
//! 4. `card.copy_limit`
//! 5. `card.legal_status`
//! 6. `format.block`
//! 7. `format.edition`
//! 8. `format.card_type`
//! 9. `format.race`
//! 10. `format.single_race`

use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use super::allow_list::{
    AllowedBlockRule, AllowedCardTypeRule, AllowedEditionRule, AllowedRaceRule, SingleRaceRule,
};
use super::card::{CopyLimitRule, LegalStatusRule};
use super::deck::{DeckSizeRule, StartingGoldRule, UnresolvedEntryRule};
use super::message::{Severity, ValidationMessage};
use super::rule::{Rule, RuleContext, RuleFault, RuleOutput};

/// Rule id used for the message that replaces a failed rule's output.
pub const RULE_FAULT_ID: &str = "engine.rule_fault";

/// An ordered list of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rule_ids()).finish()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl RuleSet {
    /// A rule set with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rules in their fixed order.
    #[must_use]
    pub fn new_standard() -> Self {
        Self::empty()
            .with_rule(UnresolvedEntryRule)
            .with_rule(DeckSizeRule)
            .with_rule(StartingGoldRule)
            .with_rule(CopyLimitRule)
            .with_rule(LegalStatusRule)
            .with_rule(AllowedBlockRule)
            .with_rule(AllowedEditionRule)
            .with_rule(AllowedCardTypeRule)
            .with_rule(AllowedRaceRule)
            .with_rule(SingleRaceRule)
    }

    /// The process-wide standard rule set, built on first use.
    #[must_use]
    pub fn standard() -> &'static RuleSet {
        static STANDARD: OnceLock<RuleSet> = OnceLock::new();
        STANDARD.get_or_init(RuleSet::new_standard)
    }

    /// Append a rule; it runs after every rule already registered.
    ///
    /// Panics if a rule with the same id is already registered.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        assert!(
            !self.rules.iter().any(|r| r.id() == rule.id()),
            "Rule {} already registered",
            rule.id()
        );
        self.rules.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule ids in execution order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.id())
    }

    /// Run every rule in order and concatenate their messages.
    ///
    /// A rule that faults or panics does not stop the others. Its partial
    /// output is dropped and replaced by one BLOCK message naming it.
    #[must_use]
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();

        for rule in &self.rules {
            match run_isolated(rule.as_ref(), ctx) {
                Ok(out) => messages.extend(out),
                Err(fault) => {
                    tracing::warn!(
                        rule_id = rule.id(),
                        rule_version = rule.version(),
                        error = %fault,
                        "rule failed; reporting fault instead"
                    );
                    messages.push(fault_message(rule.as_ref(), &fault));
                }
            }
        }

        messages
    }
}

fn run_isolated(rule: &dyn Rule, ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(RuleFault::Panicked(reason))
        }
    }
}

fn fault_message(rule: &dyn Rule, fault: &RuleFault) -> ValidationMessage {
    ValidationMessage::new(
        RULE_FAULT_ID,
        1,
        Severity::Block,
        format!("Rule {} could not be evaluated.", rule.id()),
    )
    .with_hint("The deck could not be fully checked; try again or report the problem.")
    .with_context(serde_json::json!({
        "rule_id": rule.id(),
        "rule_version": rule.version(),
        "error": fault.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckEntry;
    use crate::format::FormatConfig;

    struct Exploding;

    impl Rule for Exploding {
        fn id(&self) -> &'static str {
            "test.exploding"
        }

        fn evaluate(&self, _ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
            panic!("boom");
        }
    }

    struct Refusing;

    impl Rule for Refusing {
        fn id(&self) -> &'static str {
            "test.refusing"
        }

        fn version(&self) -> u32 {
            3
        }

        fn evaluate(&self, _ctx: &RuleContext<'_>) -> Result<RuleOutput, RuleFault> {
            Err(RuleFault::Invalid("no".into()))
        }
    }

    #[test]
    fn test_standard_order() {
        let ids: Vec<_> = RuleSet::standard().rule_ids().collect();
        assert_eq!(
            ids,
            vec![
                "deck.unresolved_entry",
                "deck.size",
                "deck.starting_gold",
                "card.copy_limit",
                "card.legal_status",
                "format.block",
                "format.edition",
                "format.card_type",
                "format.race",
                "format.single_race",
            ]
        );
    }

    #[test]
    fn test_standard_is_shared() {
        assert!(std::ptr::eq(RuleSet::standard(), RuleSet::standard()));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_rule_panics() {
        let _ = RuleSet::empty().with_rule(DeckSizeRule).with_rule(DeckSizeRule);
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let rules = RuleSet::empty()
            .with_rule(Exploding)
            .with_rule(DeckSizeRule);
        let config = FormatConfig::new("f");
        let entries = vec![DeckEntry::new("p1", "c1", "A")];

        let messages = rules.evaluate(&RuleContext::new(&config, &entries));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].rule_id, RULE_FAULT_ID);
        assert_eq!(messages[0].severity, Severity::Block);
        assert_eq!(
            messages[0].context_json.as_ref().unwrap()["error"],
            "rule panicked: boom"
        );
        assert_eq!(messages[1].rule_id, "deck.size");
    }

    #[test]
    fn test_faulting_rule_is_reported() {
        let rules = RuleSet::empty().with_rule(Refusing);
        let config = FormatConfig::new("f");

        let messages = rules.evaluate(&RuleContext::new(&config, &[]));
        assert_eq!(messages.len(), 1);
        let context = messages[0].context_json.as_ref().unwrap();
        assert_eq!(context["rule_id"], "test.refusing");
        assert_eq!(context["rule_version"], 3);
    }
}
