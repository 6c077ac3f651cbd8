//! Configuration structures for the fare aggregator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration, built once by the entry point and passed down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation pass configuration.
    pub aggregate: AggregateConfig,
    /// Price filter configuration.
    pub filter: FilterConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the aggregator cannot act on.
    pub fn validate(&self) -> Result<()> {
        self.aggregate.validate()?;
        self.filter.validate()
    }
}

/// Where result files live and where the consolidated table goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Root of the run directory tree.
    pub root: PathBuf,
    /// Name of the public output directory under the root. Never walked.
    pub public_dir: String,
    /// File name written by each capture run.
    pub result_file_name: String,
    /// File name of the consolidated table inside the public directory.
    pub output_file_name: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            public_dir: "public".to_string(),
            result_file_name: "results.csv".to_string(),
            output_file_name: "results.csv".to_string(),
        }
    }
}

impl AggregateConfig {
    /// Create a configuration rooted at `root` with default names.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Subtree excluded from discovery.
    pub fn excluded_dir(&self) -> PathBuf {
        self.root.join(&self.public_dir)
    }

    /// Full path of the consolidated output file.
    pub fn output_path(&self) -> PathBuf {
        self.excluded_dir().join(&self.output_file_name)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("public_dir", &self.public_dir),
            ("result_file_name", &self.result_file_name),
            ("output_file_name", &self.output_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("aggregate.{key} must not be empty")));
            }
            if value.contains(['/', '\\']) {
                return Err(Error::config(format!(
                    "aggregate.{key} must be a single path component, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Price filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Header name of the price column, matched case-insensitively.
    pub price_column: String,
    /// Directory receiving filtered copies.
    pub output_dir: PathBuf,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            price_column: "price_brl".to_string(),
            output_dir: PathBuf::from("resumo"),
        }
    }
}

impl FilterConfig {
    fn validate(&self) -> Result<()> {
        if self.price_column.trim().is_empty() {
            return Err(Error::config("filter.price_column must not be empty"));
        }
        Ok(())
    }
}
