//! Consolidation of normalized fare records for the fare aggregator.
//!
//! This crate provides:
//! - Ordering of canonical records (date, then price)
//! - CSV serialization of the consolidated table
//! - The aggregation pass over a data root
//! - The price filter applied to consolidated tables

pub mod filter;
pub mod ordering;
pub mod pipeline;
pub mod writer;

pub use filter::{FilterSummary, PriceFilter};
pub use ordering::sort_records;
pub use pipeline::{AggregationSummary, Aggregator, CollectedRecords};
pub use writer::{to_csv_string, write_csv};
