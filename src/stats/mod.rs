//! Statistics aggregator.
//!
//! `aggregate()` folds deck entries into `ComputedStats`. It is total: any
//! entry list, including an empty one, produces statistics.

pub mod aggregate;

pub use aggregate::{aggregate, ComputedStats, NO_COST_BUCKET};
