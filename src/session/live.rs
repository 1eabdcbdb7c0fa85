//! Live validation session for interactive deck editors.
//!
//! The editor reports each deck mutation, asks whether a debounced
//! evaluation is due, and hands back finished results. Only the result of
//! the most recently started evaluation is ever shown; a result whose
//! evaluation was overtaken by a newer one is discarded, even if it
//! finishes later.
//!
//! Time is supplied by the caller so the session holds no clock.
//!
//! ## Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use ccg_deckcheck::format::FormatConfig;
//! use ccg_deckcheck::session::{LiveSession, SessionConfig};
//! use ccg_deckcheck::validate::assemble;
//!
//! let mut session = LiveSession::new(SessionConfig::default());
//! let config = FormatConfig::new("classic");
//! let t0 = Instant::now();
//!
//! session.note_mutation(t0);
//! assert!(!session.is_due(t0));
//!
//! let later = t0 + Duration::from_millis(500);
//! assert!(session.is_due(later));
//!
//! let ticket = session.begin();
//! session.complete(ticket, assemble(&config, &[]));
//! assert!(session.latest().is_some());
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::deck::DeckEntry;
use crate::format::FormatConfig;
use crate::validate::{assemble, ValidationResult};

/// Live session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Quiet period after the last mutation before evaluating.
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Handle for one started evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EvaluationTicket(u64);

impl EvaluationTicket {
    /// Sequence number; later evaluations have larger numbers.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// What happened to a completed evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result is now the displayed one.
    Shown,
    /// A newer evaluation started first; the result was dropped.
    Stale,
}

/// Debounce and last-started-wins bookkeeping for one open deck.
///
/// Methods take `&mut self`; share across threads behind a mutex.
#[derive(Clone, Debug)]
pub struct LiveSession {
    config: SessionConfig,
    last_mutation: Option<Instant>,
    pending: bool,
    started: u64,
    shown: Option<(EvaluationTicket, ValidationResult)>,
}

impl LiveSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            last_mutation: None,
            pending: false,
            started: 0,
            shown: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Record a deck mutation (add, remove, replace printing, toggle
    /// starting gold).
    pub fn note_mutation(&mut self, now: Instant) {
        self.last_mutation = Some(now);
        self.pending = true;
    }

    /// Check whether a mutation is waiting for evaluation.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Check whether the debounce window has passed since the last
    /// unevaluated mutation.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        match (self.pending, self.last_mutation) {
            (true, Some(at)) => now.saturating_duration_since(at) >= self.config.debounce,
            _ => false,
        }
    }

    /// Start an evaluation of the current deck.
    pub fn begin(&mut self) -> EvaluationTicket {
        self.started += 1;
        self.pending = false;
        EvaluationTicket(self.started)
    }

    /// Hand back a finished evaluation.
    ///
    /// Accepted only if no evaluation started after this one.
    pub fn complete(&mut self, ticket: EvaluationTicket, result: ValidationResult) -> Completion {
        if ticket.0 != self.started {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.started,
                "discarding stale validation result"
            );
            return Completion::Stale;
        }
        self.shown = Some((ticket, result));
        Completion::Shown
    }

    /// The result currently shown, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&ValidationResult> {
        self.shown.as_ref().map(|(_, result)| result)
    }

    /// Ticket of the result currently shown.
    #[must_use]
    pub fn shown_ticket(&self) -> Option<EvaluationTicket> {
        self.shown.as_ref().map(|(ticket, _)| *ticket)
    }

    /// Synchronous convenience: evaluate inline if due.
    ///
    /// Returns the new result when an evaluation ran.
    pub fn evaluate_if_due(
        &mut self,
        now: Instant,
        config: &FormatConfig,
        entries: &[DeckEntry],
    ) -> Option<&ValidationResult> {
        if !self.is_due(now) {
            return None;
        }
        let ticket = self.begin();
        let result = assemble(config, entries);
        match self.complete(ticket, result) {
            Completion::Shown => self.latest(),
            Completion::Stale => None,
        }
    }
}

impl Default for LiveSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(format: &str) -> ValidationResult {
        assemble(&FormatConfig::new(format), &[])
    }

    #[test]
    fn test_not_due_without_mutation() {
        let session = LiveSession::default();
        assert!(!session.is_pending());
        assert!(!session.is_due(Instant::now()));
    }

    #[test]
    fn test_debounce_window() {
        let mut session =
            LiveSession::new(SessionConfig::default().with_debounce(Duration::from_millis(100)));
        let t0 = Instant::now();

        session.note_mutation(t0);
        assert!(!session.is_due(t0 + Duration::from_millis(50)));

        // A further mutation restarts the window.
        session.note_mutation(t0 + Duration::from_millis(80));
        assert!(!session.is_due(t0 + Duration::from_millis(150)));
        assert!(session.is_due(t0 + Duration::from_millis(180)));
    }

    #[test]
    fn test_begin_clears_pending() {
        let mut session = LiveSession::default();
        let t0 = Instant::now();
        session.note_mutation(t0);
        session.begin();

        assert!(!session.is_pending());
        assert!(!session.is_due(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_last_started_wins() {
        let mut session = LiveSession::default();

        let first = session.begin();
        let second = session.begin();

        assert_eq!(session.complete(second, result("second")), Completion::Shown);
        assert_eq!(session.complete(first, result("first")), Completion::Stale);

        assert_eq!(session.latest().unwrap().format_id.as_str(), "second");
        assert_eq!(session.shown_ticket(), Some(second));
    }

    #[test]
    fn test_superseded_before_completion() {
        let mut session = LiveSession::default();

        let first = session.begin();
        let _second = session.begin();

        assert_eq!(session.complete(first, result("first")), Completion::Stale);
        assert!(session.latest().is_none());
    }

    #[test]
    fn test_evaluate_if_due() {
        let mut session = LiveSession::default();
        let config = FormatConfig::new("f");
        let t0 = Instant::now();

        assert!(session.evaluate_if_due(t0, &config, &[]).is_none());

        session.note_mutation(t0);
        let later = t0 + session.config().debounce;
        let shown = session.evaluate_if_due(later, &config, &[]).unwrap();
        assert!(!shown.is_valid);

        assert!(session.evaluate_if_due(later, &config, &[]).is_none());
        assert_eq!(session.shown_ticket().map(EvaluationTicket::sequence), Some(1));
    }
}
