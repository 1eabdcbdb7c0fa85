//! Persistence records for validation runs.
//!
//! The engine never writes to storage. These types are the shape the
//! persistence layer stores: one run row plus ordered message rows.

pub mod run;

pub use run::{MessageRecord, RecordError, ValidationRunRecord};
