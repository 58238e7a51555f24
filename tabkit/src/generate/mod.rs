//! Sine-wave table generator.
//!
//! Produces `rows` samples of `y = sin(x)` and writes them as a two-column
//! CSV (`x,y`). The x values come from one of two domains:
//!
//! - [`Domain::Index`]: `x = i`, covering `[0, rows - 1]`
//! - [`Domain::Period`]: `x = i * 2π / (rows - 1)`, covering exactly one period

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CsvError, GenerateError, GenerateResult};
use crate::logs::{log_info, log_success};
use crate::models::SinePoint;
use crate::parser::csv_writer;

/// Row count used when none is given
pub const DEFAULT_ROWS: usize = 20;

/// Smallest row count the period domain can be spread over
pub const MIN_PERIOD_ROWS: usize = 2;

/// How a row index maps onto x
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// x is the row index itself
    #[default]
    Index,
    /// x spans `[0, 2π]` in `rows - 1` equal steps
    Period,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Index => write!(f, "index"),
            Domain::Period => write!(f, "period"),
        }
    }
}

/// Options for the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Number of data rows to produce
    pub rows: usize,

    /// Mapping from row index to x
    #[serde(default)]
    pub domain: Domain,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            domain: Domain::Index,
        }
    }
}

impl GeneratorOptions {
    /// Check the options can produce a table.
    pub fn validate(&self) -> GenerateResult<()> {
        if self.domain == Domain::Period && self.rows < MIN_PERIOD_ROWS {
            return Err(GenerateError::TooFewRows {
                rows: self.rows,
                min: MIN_PERIOD_ROWS,
            });
        }
        Ok(())
    }

    /// x value of the `index`-th row. Assumes the options are valid.
    fn x_at(&self, index: usize) -> f64 {
        match self.domain {
            Domain::Index => index as f64,
            Domain::Period => index as f64 * TAU / (self.rows - 1) as f64,
        }
    }
}

/// What a generator run produced
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub domain: Domain,
}

/// Compute the samples without writing anything.
pub fn sample(options: &GeneratorOptions) -> GenerateResult<Vec<SinePoint>> {
    options.validate()?;
    Ok((0..options.rows)
        .map(|i| SinePoint::at(i, options.x_at(i)))
        .collect())
}

/// Write the `x,y` table to `writer`. Returns the number of data rows written.
pub fn write_sine<W: Write>(writer: W, options: &GeneratorOptions) -> GenerateResult<usize> {
    let points = sample(options)?;

    let mut wtr = csv_writer(writer);
    wtr.write_record(["x", "y"]).map_err(CsvError::from)?;
    for point in &points {
        let x = match options.domain {
            Domain::Index => point.index.to_string(),
            Domain::Period => format_float(point.x),
        };
        wtr.write_record([x, format_float(point.y)])
            .map_err(CsvError::from)?;
    }
    wtr.flush().map_err(CsvError::from)?;

    Ok(points.len())
}

/// Generate the table into `path`, replacing any existing file.
///
/// The options are validated before the file is created, so a rejected
/// configuration leaves the filesystem untouched.
pub fn write_sine_csv<P: AsRef<Path>>(
    path: P,
    options: &GeneratorOptions,
) -> GenerateResult<GenerateSummary> {
    let path = path.as_ref();
    options.validate()?;

    log_info(format!(
        "📈 Generating {} rows over the {} domain...",
        options.rows, options.domain
    ));

    let file = File::create(path).map_err(CsvError::from)?;
    let rows = write_sine(BufWriter::new(file), options)?;

    log_success(format!("Wrote {} rows to {}", rows, path.display()));

    Ok(GenerateSummary {
        path: path.to_path_buf(),
        rows,
        domain: options.domain,
    })
}

/// Shortest round-trip text for a float, keeping a `.0` on integral values.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
