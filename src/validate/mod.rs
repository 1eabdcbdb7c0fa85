//! Result assembly: statistics plus rule messages into one verdict.
//!
//! ## Key Types
//!
//! - `assemble()`: Standard entry point, `(config, entries) -> ValidationResult`
//! - `assemble_with()`: Same with a caller-supplied `RuleSet`
//! - `validate_deck()`: Resolve a format first, then assemble
//! - `ValidationResult`: Validity flag, ordered messages, stats, timing

pub mod assembler;
pub mod result;

pub use assembler::{assemble, assemble_with, validate_deck};
pub use result::{Timing, ValidationResult};
