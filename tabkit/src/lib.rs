//! # tabkit - sine tables and day reindexing for CSV files
//!
//! Two independent batch tools sharing one CSV layer:
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐
//! │  Generator   │────▶│  sin.csv    │────▶ training data loader
//! │ (y = sin x)  │     │  (x,y)      │
//! └──────────────┘     └─────────────┘
//!
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  dated CSV  │────▶│   Reindex   │────▶│  day CSV    │
//! │ (Date, ...) │     │ (day first) │     │ (day, ...)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabkit::{write_sine_csv, reindex_csv, GeneratorOptions, ReindexOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     write_sine_csv("sin.csv", &GeneratorOptions::default())?;
//!
//!     let options = ReindexOptions { output: Some("days.csv".into()), overwrite: false };
//!     reindex_csv(Path::new("sample.csv"), &options)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`logs`] - Progress logging
//! - [`models`] - Tables and sine samples
//! - [`parser`] - CSV reading/writing with encoding detection
//! - [`generate`] - Sine table generator
//! - [`transform`] - Day reindexing
//! - [`dataset`] - Numeric training data loader
//! - [`model`] - Feed-forward network trained on loaded data

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// CSV I/O
pub mod parser;

// Tools
pub mod dataset;
pub mod generate;
pub mod model;
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, DatasetError, GenerateError, ModelError, PipelineError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{SinePoint, Table};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_bytes_auto,
    parse_table,
    read_table,
    write_table,
    write_table_file,
    ParseResult,
};

// =============================================================================
// Re-exports - Generator
// =============================================================================

pub use generate::{
    sample,
    write_sine,
    write_sine_csv,
    Domain,
    GenerateSummary,
    GeneratorOptions,
};

// =============================================================================
// Re-exports - Reindex
// =============================================================================

pub use transform::{
    reindex_csv,
    reindex_table,
    ReindexOptions,
    ReindexSummary,
    DATE_COLUMN,
    DAY_COLUMN,
};

// =============================================================================
// Re-exports - Training data
// =============================================================================

pub use dataset::{
    load_training_data,
    parse_training_data,
    ColumnRole,
    DatasetColumn,
    TrainingData,
};

// =============================================================================
// Re-exports - Model
// =============================================================================

pub use model::{
    train_csv,
    Activation,
    EpochMetrics,
    Model,
    ModelOptions,
    Neuron,
    TrainingReport,
};
