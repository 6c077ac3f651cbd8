//! Core types and configuration for the fare aggregator.
//!
//! This crate provides shared types used across all other crates:
//! - Raw and canonical fare records
//! - Run metadata inferred from storage paths
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
