//! Caller-side helpers for the interactive validation path.
//!
//! The engine itself has no timing or cancellation; `LiveSession` holds the
//! debounce and stale-result bookkeeping an editor needs around it.

pub mod live;

pub use live::{Completion, EvaluationTicket, LiveSession, SessionConfig};
