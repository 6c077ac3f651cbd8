//! The aggregation pass.
//!
//! discover → read and parse each file in turn → normalize → sort → write once.
//! The output is fully rewritten, so rerunning on the same tree reproduces it.

use std::path::{Path, PathBuf};

use fare_core::config::AggregateConfig;
use fare_core::{CanonicalRecord, Error, Result, RunContext};
use fare_ingestion::{discover_result_files, normalize, parse_records};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ordering::sort_records;
use crate::writer::write_csv;

/// What one aggregation pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSummary {
    /// Result files discovered under the root.
    pub files_found: usize,
    /// Files skipped because they couldn't be read.
    pub files_skipped: usize,
    /// Records written to the consolidated table.
    pub records: usize,
    /// Records whose date isn't `YYYY-MM-DD`; their position in the table
    /// may not follow calendar order.
    pub undated_records: usize,
    /// Path of the consolidated table.
    pub output: PathBuf,
}

/// Sorted records gathered from a data root, before anything is written.
#[derive(Debug, Clone, Default)]
pub struct CollectedRecords {
    /// Records from every readable file, in table order.
    pub records: Vec<CanonicalRecord>,
    /// Result files discovered under the root.
    pub files_found: usize,
    /// Files skipped because they couldn't be read.
    pub files_skipped: usize,
}

/// Consolidates every run's result file into one table.
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregateConfig,
}

impl Aggregator {
    /// Create an aggregator for the given configuration.
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    /// Collect and sort every record without writing anything.
    pub async fn collect(&self) -> CollectedRecords {
        let files = discover_result_files(&self.config);
        let mut records = Vec::new();
        let mut skipped = 0;

        for file in &files {
            match self.load_file(file).await {
                Ok(mut rows) => {
                    debug!(file = %file.display(), rows = rows.len(), "parsed result file");
                    records.append(&mut rows);
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable result file");
                    skipped += 1;
                }
            }
        }

        sort_records(&mut records);
        CollectedRecords {
            records,
            files_found: files.len(),
            files_skipped: skipped,
        }
    }

    /// Run one full pass and write the consolidated table.
    ///
    /// Unreadable input files are skipped. Failing to write the output is an
    /// error.
    pub async fn run(&self) -> Result<AggregationSummary> {
        let CollectedRecords {
            records,
            files_found,
            files_skipped,
        } = self.collect().await;

        let undated_records = records.iter().filter(|r| !r.has_iso_date()).count();
        if undated_records > 0 {
            warn!(
                count = undated_records,
                "records without a YYYY-MM-DD date; ordering by date may be off"
            );
        }

        let output = self.config.output_path();
        write_csv(&output, &records).await?;

        let summary = AggregationSummary {
            files_found,
            files_skipped,
            records: records.len(),
            undated_records,
            output,
        };
        info!(
            files = summary.files_found,
            skipped = summary.files_skipped,
            records = summary.records,
            output = %summary.output.display(),
            "aggregation complete"
        );
        Ok(summary)
    }

    /// Read, parse and normalize a single result file.
    async fn load_file(&self, path: &Path) -> Result<Vec<CanonicalRecord>> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::read(path, e))?;
        let relative = path.strip_prefix(&self.config.root).unwrap_or(path);
        let ctx = RunContext::from_relative_path(relative);

        Ok(parse_records(&text)
            .iter()
            .map(|raw| normalize(raw, &ctx))
            .collect())
    }
}
