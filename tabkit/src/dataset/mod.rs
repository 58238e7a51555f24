//! Numeric training data loaded from CSV.
//!
//! By default the first column is the network input and every other column
//! is a target output, so a generated `x,y` sine table loads as one input
//! (`x`) and one target (`y`). [`TrainingData::assign_roles`] overrides
//! that split by column name.
//!
//! Cells are read the way a JavaScript `parseFloat` reads them: the longest
//! numeric prefix counts (`"10%"` is 10) and cells with no numeric prefix
//! load as `0`.

use serde::Serialize;
use std::path::Path;

use crate::error::{CsvResult, DatasetError, DatasetResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::Table;
use crate::parser::{parse_bytes_auto, read_table};

/// What the network does with a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Fed to the input layer
    Input,
    /// Predicted by the output layer
    Output,
    /// Not used for training
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetColumn {
    pub name: String,
    pub role: ColumnRole,
}

/// A numeric matrix with a role per column
#[derive(Debug, Clone, Serialize)]
pub struct TrainingData {
    pub columns: Vec<DatasetColumn>,
    pub rows: Vec<Vec<f64>>,
}

impl TrainingData {
    /// Convert a text table, returning the data and how many cells were not numbers.
    pub fn from_table(table: &Table) -> (Self, usize) {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| DatasetColumn {
                name: name.clone(),
                role: if i == 0 { ColumnRole::Input } else { ColumnRole::Output },
            })
            .collect();

        let mut coerced = 0;
        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        parse_number(cell).unwrap_or_else(|| {
                            coerced += 1;
                            0.0
                        })
                    })
                    .collect()
            })
            .collect();

        (Self { columns, rows }, coerced)
    }

    /// Reassign column roles by name.
    ///
    /// - only `inputs` given: those are inputs, every other column is an output
    /// - only `outputs` given: those are outputs, every other column is an input
    /// - both given: the named columns get their role, the rest are ignored
    /// - neither given: roles are left as they are
    pub fn assign_roles(&mut self, inputs: &[String], outputs: &[String]) -> DatasetResult<()> {
        if inputs.is_empty() && outputs.is_empty() {
            return Ok(());
        }

        for name in inputs.iter().chain(outputs) {
            if !self.columns.iter().any(|c| &c.name == name) {
                return Err(DatasetError::UnknownColumn(name.clone()));
            }
        }
        if let Some(name) = inputs.iter().find(|name| outputs.contains(*name)) {
            return Err(DatasetError::RoleConflict(name.clone()));
        }

        let rest = match (inputs.is_empty(), outputs.is_empty()) {
            (false, true) => ColumnRole::Output,
            (true, false) => ColumnRole::Input,
            _ => ColumnRole::Ignored,
        };
        for column in &mut self.columns {
            column.role = if inputs.contains(&column.name) {
                ColumnRole::Input
            } else if outputs.contains(&column.name) {
                ColumnRole::Output
            } else {
                rest
            };
        }
        Ok(())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positions of the columns with a given role
    pub fn indices(&self, role: ColumnRole) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role == role)
            .map(|(i, _)| i)
            .collect()
    }

    fn pick(&self, row: usize, role: ColumnRole) -> Option<Vec<f64>> {
        let values = self.rows.get(row)?;
        Some(
            self.indices(role)
                .into_iter()
                .map(|i| values.get(i).copied().unwrap_or(0.0))
                .collect(),
        )
    }

    /// Input values of a sample
    pub fn inputs(&self, row: usize) -> Option<Vec<f64>> {
        self.pick(row, ColumnRole::Input)
    }

    /// Target values of a sample
    pub fn targets(&self, row: usize) -> Option<Vec<f64>> {
        self.pick(row, ColumnRole::Output)
    }
}

/// Longest numeric prefix of a cell, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, an optional
/// exponent (only taken when it has digits) and `Infinity`.
fn parse_number(cell: &str) -> Option<f64> {
    let s = cell.trim_start();
    let bytes = s.as_bytes();
    let digits_at = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_end = digits_at(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_at(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_at(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Load training data from raw CSV bytes.
pub fn parse_training_data(bytes: &[u8]) -> CsvResult<TrainingData> {
    let parsed = parse_bytes_auto(bytes)?;
    Ok(convert(&parsed.table))
}

/// Load training data from a CSV file.
pub fn load_training_data<P: AsRef<Path>>(path: P) -> CsvResult<TrainingData> {
    log_info(format!("📖 Loading training data from {}...", path.as_ref().display()));
    let parsed = read_table(path)?;
    Ok(convert(&parsed.table))
}

fn convert(table: &Table) -> TrainingData {
    let (data, coerced) = TrainingData::from_table(table);
    if coerced > 0 {
        log_warning(format!("{} non-numeric cells loaded as 0", coerced));
    }
    log_success(format!(
        "Loaded {} samples ({} input, {} output columns)",
        data.len(),
        data.indices(ColumnRole::Input).len(),
        data.indices(ColumnRole::Output).len()
    ));
    data
}
