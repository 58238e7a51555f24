//! Error types for tabkit.
//!
//! - [`CsvError`] - reading and writing CSV files
//! - [`GenerateError`] - sine table generation
//! - [`TransformError`] - table reshaping (day reindexing)
//! - [`DatasetError`] - column role assignment
//! - [`ModelError`] - network construction and training
//! - [`PipelineError`] - file-level orchestration
//!
//! Conversions are provided via `From` so `?` works across boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content (ragged rows, bad quoting, ...).
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),

    /// No header row at all.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Header row present but without any column.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// The detected encoding has no decoder.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

// =============================================================================
// Generation Errors
// =============================================================================

/// Errors from the sine table generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The period domain spans `rows - 1` intervals and needs at least two rows.
    #[error("Period domain needs at least {min} rows, got {rows}")]
    TooFewRows { rows: usize, min: usize },

    /// Writing the table failed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while reshaping a table.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the transformation depends on is absent.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The output path exists and overwriting was not requested.
    #[error("Refusing to overwrite '{}' (pass --overwrite to allow it)", .0.display())]
    WouldOverwrite(PathBuf),

    /// A row does not have one cell per header.
    #[error("Row {row} has {got} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },
}

// =============================================================================
// Dataset Errors
// =============================================================================

/// Errors while assigning input/output roles to columns.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A role was requested for a column the file does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The same column was named both as an input and as an output.
    #[error("Column '{0}' cannot be both an input and an output")]
    RoleConflict(String),
}

// =============================================================================
// Model Errors
// =============================================================================

/// Errors from the neural network.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No column has the input role.
    #[error("No input columns")]
    NoInputs,

    /// No column has the output role.
    #[error("No output columns")]
    NoOutputs,

    /// Training needs at least one sample.
    #[error("No training data available")]
    NoSamples,

    /// A hidden layer was configured with zero neurons.
    #[error("Hidden layer {0} has no neurons")]
    EmptyLayer(usize),

    /// Learning rate must be a positive finite number.
    #[error("Invalid learning rate: {0}")]
    InvalidLearningRate(f64),

    /// Input vector does not match the network's input width.
    #[error("Input size mismatch: network expects {expected} inputs, got {got}")]
    InputMismatch { expected: usize, got: usize },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by the file-level operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Generation failed.
    #[error("Generate error: {0}")]
    Generate(#[from] GenerateError),

    /// Table transformation failed.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Column roles could not be applied.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Network construction or training failed.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Result type for table transformations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for role assignment.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type for network operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
