//! Domain models: in-memory tables and sine samples.

use serde::{Deserialize, Serialize};

// =============================================================================
// Table
// =============================================================================

/// An ordered set of rows sharing one header.
///
/// Cells are kept as the text read from the file, so columns the caller
/// never touches are written back exactly as they came in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in positional order
    pub headers: Vec<String>,
    /// Data rows, each aligned to `headers`
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// First row whose cell count differs from the header, as `(row, cells)`.
    ///
    /// The column operations below assume there is none.
    pub fn ragged_row(&self) -> Option<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.headers.len())
            .map(|(i, row)| (i, row.len()))
    }

    /// Position of the first column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Set a column's values, replacing it in place if it exists and
    /// appending it as the last column otherwise.
    ///
    /// `values` must hold one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Remove a column, returning its values. `None` if there is no such column.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<String>> {
        let idx = self.column_index(name)?;
        self.headers.remove(idx);
        Some(self.rows.iter_mut().map(|row| row.remove(idx)).collect())
    }

    /// Move a column to position 0, keeping the relative order of the others.
    /// Returns `false` if there is no such column.
    pub fn move_column_to_front(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.headers[..=idx].rotate_right(1);
        for row in &mut self.rows {
            row[..=idx].rotate_right(1);
        }
        true
    }
}

// =============================================================================
// Sine samples
// =============================================================================

/// One generated row: `y = sin(x)` for the `index`-th sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SinePoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl SinePoint {
    pub fn at(index: usize, x: f64) -> Self {
        Self { index, x, y: x.sin() }
    }
}
