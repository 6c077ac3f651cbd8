//! Result file ingestion and normalization for the fare aggregator.
//!
//! This crate handles:
//! - Discovery of per-run result files under the data root
//! - Delimited-text parsing with separator sniffing
//! - Alias-based field normalization and price cleanup

pub mod discovery;
pub mod normalizer;
pub mod parser;

pub use discovery::discover_result_files;
pub use normalizer::{clean_price, normalize, ALIASES};
pub use parser::{parse_records, Separator};
