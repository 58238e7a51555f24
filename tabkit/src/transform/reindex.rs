//! Day reindexing of dated tables.
//!
//! Replaces the `Date` column with a 1-based `day` counter placed first.

use crate::error::{TransformError, TransformResult};
use crate::models::Table;

/// Column removed by the reindex
pub const DATE_COLUMN: &str = "Date";

/// Derived column added by the reindex
pub const DAY_COLUMN: &str = "day";

/// Reindex a table by day.
///
/// 1. `day` gets the values `1..=len` in current row order (an existing
///    `day` column is overwritten in place)
/// 2. `Date` is removed
/// 3. `day` is moved to the first position
///
/// Row order and the relative order of the other columns are unchanged.
/// A table whose rows do not all match the header width is rejected with
/// [`TransformError::RaggedRow`].
///
/// # Example
/// ```
/// use tabkit::{parse_table, reindex_table};
///
/// let table = parse_table("Date,Value\n2020-01-01,10\n2020-01-02,20\n").unwrap();
/// let table = reindex_table(table).unwrap();
///
/// assert_eq!(table.headers, vec!["day", "Value"]);
/// assert_eq!(table.rows, vec![vec!["1", "10"], vec!["2", "20"]]);
/// ```
pub fn reindex_table(mut table: Table) -> TransformResult<Table> {
    if let Some((row, got)) = table.ragged_row() {
        return Err(TransformError::RaggedRow {
            row,
            expected: table.width(),
            got,
        });
    }
    if table.column_index(DATE_COLUMN).is_none() {
        return Err(TransformError::MissingColumn(DATE_COLUMN.to_string()));
    }

    let days = (1..=table.len()).map(|d| d.to_string()).collect();
    table.set_column(DAY_COLUMN, days);
    table.drop_column(DATE_COLUMN);
    table.move_column_to_front(DAY_COLUMN);

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    #[test]
    fn test_basic_reindex() {
        let table = parse_table("Date,Value\n2020-01-01,10\n2020-01-02,20\n").unwrap();
        let out = reindex_table(table).unwrap();

        assert_eq!(out.headers, vec!["day", "Value"]);
        assert_eq!(out.column("day").unwrap(), vec!["1", "2"]);
        assert_eq!(out.column("Value").unwrap(), vec!["10", "20"]);
    }

    #[test]
    fn test_other_columns_keep_relative_order() {
        let csv = "Open,Date,High,Low\n1,2020-01-01,2,0\n3,2020-01-02,4,2\n5,2020-01-03,6,4\n";
        let out = reindex_table(parse_table(csv).unwrap()).unwrap();

        assert_eq!(out.headers, vec!["day", "Open", "High", "Low"]);
        assert_eq!(out.rows[2], vec!["3", "5", "6", "4"]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_days_follow_row_order_not_dates() {
        let csv = "Date,Value\n2020-03-01,a\n2020-01-01,b\n2020-02-01,c\n";
        let out = reindex_table(parse_table(csv).unwrap()).unwrap();

        assert_eq!(out.column("day").unwrap(), vec!["1", "2", "3"]);
        assert_eq!(out.column("Value").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_existing_day_column_is_replaced() {
        let csv = "Value,day,Date\n10,x,2020-01-01\n20,y,2020-01-02\n";
        let out = reindex_table(parse_table(csv).unwrap()).unwrap();

        assert_eq!(out.headers, vec!["day", "Value"]);
        assert_eq!(out.column("day").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_header_only_table() {
        let out = reindex_table(parse_table("Date,Value\n").unwrap()).unwrap();

        assert_eq!(out.headers, vec!["day", "Value"]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_date_column() {
        let table = parse_table("day,Value\n1,10\n").unwrap();
        let err = reindex_table(table).unwrap_err();

        assert!(matches!(err, TransformError::MissingColumn(ref c) if c == "Date"));
    }

    #[test]
    fn test_ragged_table_is_rejected() {
        let table = Table {
            headers: vec!["Date".into(), "Value".into()],
            rows: vec![vec!["2020-01-01".into()]],
        };
        let err = reindex_table(table).unwrap_err();

        assert!(matches!(
            err,
            TransformError::RaggedRow { row: 0, expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_second_pass_fails() {
        let table = parse_table("Date,Value\n2020-01-01,10\n").unwrap();
        let once = reindex_table(table).unwrap();

        assert!(reindex_table(once).is_err());
    }
}
