//! Discovery of per-run result files.
//!
//! Walks the data root depth-first with entries sorted by file name, so
//! repeated runs see files in the same order.

use std::path::PathBuf;

use fare_core::config::AggregateConfig;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Find every result file under the configured root.
///
/// A missing root yields no files. The public output directory is never
/// entered. Entries that can't be read are logged and skipped.
pub fn discover_result_files(config: &AggregateConfig) -> Vec<PathBuf> {
    let root = config.root.as_path();
    if !root.is_dir() {
        debug!(root = %root.display(), "data root does not exist");
        return Vec::new();
    }

    let excluded = config.excluded_dir();
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.path() == excluded));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() && entry.file_name() == config.result_file_name.as_str() {
            found.push(entry.into_path());
        }
    }

    debug!(count = found.len(), "discovered result files");
    found
}
