//! Diagnostic messages emitted by rules.

use serde::{Deserialize, Serialize};

use crate::deck::{CardId, PrintingId};

/// Severity of a diagnostic.
///
/// Only `Block` affects validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// The deck is not legal in the format.
    Block,
    /// Legal, but the player should know.
    Warn,
    /// Informational only.
    Info,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 3] = [Severity::Block, Severity::Warn, Severity::Info];

    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Severity::Block)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Block => "BLOCK",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a message points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// A card, across all of its printings.
    Card(CardId),
    /// One specific printing.
    Printing(PrintingId),
    /// A deck line by position, for lines without catalog identity.
    Line(usize),
}

impl EntityRef {
    /// Kind label used by flat storage.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            EntityRef::Card(_) => "card",
            EntityRef::Printing(_) => "printing",
            EntityRef::Line(_) => "line",
        }
    }

    /// Identifier rendered as text.
    #[must_use]
    pub fn id_text(&self) -> String {
        match self {
            EntityRef::Card(id) => id.as_str().to_string(),
            EntityRef::Printing(id) => id.as_str().to_string(),
            EntityRef::Line(index) => index.to_string(),
        }
    }

    /// Rebuild from a `(kind, id)` pair produced by `kind()`/`id_text()`.
    #[must_use]
    pub fn from_parts(kind: &str, id: &str) -> Option<Self> {
        match kind {
            "card" => Some(EntityRef::Card(CardId::new(id))),
            "printing" => Some(EntityRef::Printing(PrintingId::new(id))),
            "line" => id.parse().ok().map(EntityRef::Line),
            _ => None,
        }
    }
}

/// One diagnostic produced by a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub rule_id: String,
    pub rule_version: u32,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub entity_ref: Option<EntityRef>,
    /// Structured detail for this message.
    #[serde(default)]
    pub context_json: Option<serde_json::Value>,
}

impl ValidationMessage {
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        rule_version: u32,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule_version,
            severity,
            message: message.into(),
            hint: None,
            entity_ref: None,
            context_json: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity_ref = Some(entity);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context_json = Some(context);
        self
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}
