//! Rule evaluators.
//!
//! Each rule is a pure check over a `FormatConfig` and the deck's entries,
//! identified by a stable `rule_id` and a `rule_version`. A `RuleSet` runs
//! rules in a fixed order so repeated validation of the same deck produces
//! identical output.
//!
//! Rules never short-circuit: every rule runs and reports every violation,
//! even when an earlier rule already blocked the deck.

pub mod allow_list;
pub mod card;
pub mod deck;
pub mod message;
pub mod registry;
pub mod rule;

pub use allow_list::{
    AllowedBlockRule, AllowedCardTypeRule, AllowedEditionRule, AllowedRaceRule, SingleRaceRule,
};
pub use card::{CopyLimitRule, LegalStatusRule};
pub use deck::{DeckSizeRule, StartingGoldRule, UnresolvedEntryRule};
pub use message::{EntityRef, Severity, ValidationMessage};
pub use registry::{RuleSet, RULE_FAULT_ID};
pub use rule::{Rule, RuleContext, RuleFault, RuleOutput};
