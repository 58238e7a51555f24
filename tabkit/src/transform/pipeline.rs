//! File-level reindexing: read, reindex by day, write.
//!
//! # Example
//!
//! ```rust,no_run
//! use tabkit::{reindex_csv, ReindexOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Rewrite sample.csv in place
//!     let summary = reindex_csv(
//!         Path::new("sample.csv"),
//!         &ReindexOptions { output: None, overwrite: true },
//!     )?;
//!     println!("Reindexed {} rows", summary.rows);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::reindex::reindex_table;
use crate::error::{PipelineResult, TransformError};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::parser::{read_table, write_table_file};

/// Options for [`reindex_csv`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReindexOptions {
    /// Destination file. `None` writes back to the input.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Allow replacing an existing destination (including the input itself)
    #[serde(default)]
    pub overwrite: bool,
}

impl ReindexOptions {
    /// Where the result goes for a given input
    pub fn target(&self, input: &Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| input.to_path_buf())
    }
}

/// What a reindex run did
#[derive(Debug, Clone, Serialize)]
pub struct ReindexSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Detected input encoding
    pub encoding: String,
    /// Data rows written
    pub rows: usize,
    /// Output header
    pub columns: Vec<String>,
}

/// Reindex a CSV file by day.
///
/// The whole input is read before anything is written. If the destination
/// already exists and `overwrite` is not set the run stops with
/// [`TransformError::WouldOverwrite`] and no file is touched.
pub fn reindex_csv(input: &Path, options: &ReindexOptions) -> PipelineResult<ReindexSummary> {
    log_info(format!("📖 Reading {}...", input.display()));
    let parsed = read_table(input)?;
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Read {} rows, {} columns",
        parsed.table.len(),
        parsed.table.width()
    ));

    log_info("🔄 Reindexing by day...");
    let table = reindex_table(parsed.table)?;
    for (i, col) in table.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    let output = options.target(input);
    if output.exists() {
        if !options.overwrite {
            return Err(TransformError::WouldOverwrite(output).into());
        }
        if output.as_path() == input {
            log_warning(format!("Overwriting {} in place", input.display()));
        }
    }

    write_table_file(&output, &table)?;
    log_success(format!("💾 Wrote {} rows to {}", table.len(), output.display()));

    Ok(ReindexSummary {
        input: input.to_path_buf(),
        output,
        encoding: parsed.encoding,
        rows: table.len(),
        columns: table.headers,
    })
}
