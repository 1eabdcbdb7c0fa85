//! Deck entry model: catalog identifiers and resolved deck lines.
//!
//! ## Key Types
//!
//! - `CardId`, `PrintingId`, ...: Opaque catalog identifiers
//! - `LegalStatus`: Per-printing legality flag
//! - `DeckEntry`: One resolved deck line with every attribute rules need

pub mod entry;
pub mod ids;

pub use entry::{DeckEntry, LegalStatus};
pub use ids::{BlockId, CardId, CardTypeId, EditionId, FormatId, PrintingId, RaceId, RarityId};
