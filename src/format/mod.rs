//! Format configuration: stored definitions and the flat config rules read.
//!
//! ## Key Types
//!
//! - `FormatParams`: Deck size, copy limit, discontinued severity
//! - `AllowList`: Allowed values for one dimension (empty = unrestricted)
//! - `FormatConfig`: Everything a validation run needs to know about a format
//! - `FormatSource`: Storage seam; `resolve()` builds a `FormatConfig`
//! - `InMemoryFormats`: Hash-map backed `FormatSource`

pub mod config;
pub mod resolver;

pub use config::{AllowList, DiscontinuedSeverity, FormatConfig, FormatParams, LimitSource};
pub use resolver::{CardLimitRow, FormatDefinition, FormatError, FormatSource, InMemoryFormats};
