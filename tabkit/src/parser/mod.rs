//! CSV reading and writing for [`Table`]s.
//!
//! Input encoding is auto-detected; output is always UTF-8 with `\n`
//! record terminators and no index column.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::Table;

/// Result of reading a table, with the encoding it was decoded from
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    pub encoding: String,
}

/// Detect the encoding of raw bytes, asking chardet only when they are not valid UTF-8
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes using the given encoding label, dropping a leading byte-order mark.
///
/// ISO-8859-1 maps every byte to the code point of the same value. Other
/// labels are resolved through the WHATWG label table; a label with no
/// decoder is an error rather than a lossy guess.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.trim().to_lowercase().as_str() {
        "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" => {
            encoding_rs::mem::decode_latin1(bytes).into_owned()
        }
        label => {
            let codec = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| CsvError::UnsupportedEncoding(encoding.to_string()))?;
            codec.decode(bytes).0.into_owned()
        }
    };

    Ok(match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    })
}

/// Parse comma-separated text into a table.
///
/// The first record is the header. Every data row must have as many fields
/// as the header.
///
/// # Example
/// ```
/// let table = tabkit::parse_table("Date,Value\n2020-01-01,10\n").unwrap();
/// assert_eq!(table.headers, vec!["Date", "Value"]);
/// assert_eq!(table.rows[0], vec!["2020-01-01", "10"]);
/// ```
pub fn parse_table(content: &str) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(String::from).collect());
    }

    Ok(table)
}

/// Parse raw bytes with encoding auto-detection.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let table = parse_table(&content)?;

    Ok(ParseResult { table, encoding })
}

/// Read a CSV file into a table.
pub fn read_table<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Write a table, header first, to any writer.
pub fn write_table<W: Write>(writer: W, table: &Table) -> CsvResult<()> {
    let mut wtr = csv_writer(writer);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a table to a file, truncating anything already there.
pub fn write_table_file<P: AsRef<Path>>(path: P, table: &Table) -> CsvResult<()> {
    let file = File::create(path.as_ref())?;
    write_table(BufWriter::new(file), table)
}

/// CSV writer configured for tabkit output.
pub(crate) fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_simple_csv() {
        let table = parse_table("name,age\nAlice,30\nBob,25").unwrap();

        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["Alice", "30"]);
        assert_eq!(table.rows[1], vec!["Bob", "25"]);
    }

    #[test]
    fn test_quoted_values() {
        let table = parse_table("name,value\n\"Doe, Jane\",\"Hello World\"\n").unwrap();

        assert_eq!(table.rows[0], vec!["Doe, Jane", "Hello World"]);
    }

    #[test]
    fn test_header_only() {
        let table = parse_table("Date,Value\n").unwrap();

        assert_eq!(table.width(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_table(""), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_table("  \n"), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_ragged_row_error() {
        let result = parse_table("a,b\n1,2,3\n");
        assert!(matches!(result, Err(CsvError::Parse(_))));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_keeps_symbols_that_differ_in_latin9() {
        let decoded = decode_content(&[0xA4, 0xBD, 0xBE], "iso-8859-1").unwrap();
        assert_eq!(decoded, "¤½¾");

        // Same bytes really are different characters in ISO-8859-15
        let latin9 = decode_content(&[0xA4, 0xBD, 0xBE], "iso-8859-15").unwrap();
        assert_eq!(latin9, "€œŸ");
    }

    #[test]
    fn test_latin1_is_not_windows_1252() {
        assert_eq!(decode_content(&[0x80], "latin1").unwrap(), "\u{80}");
        assert_eq!(decode_content(&[0x80], "windows-1252").unwrap(), "€");
    }

    #[test]
    fn test_latin1_cells_survive_rewrite() {
        let bytes = b"Date,Note\n2020-01-01,\xA4\xBD\xBE\n";
        let content = decode_content(bytes, "iso-8859-1").unwrap();
        let table = parse_table(&content).unwrap();

        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Date,Note\n2020-01-01,¤½¾\n");
    }

    #[test]
    fn test_unknown_encoding_error() {
        let result = decode_content(b"abc", "x-no-such-charset");
        assert!(matches!(result, Err(CsvError::UnsupportedEncoding(ref e)) if e == "x-no-such-charset"));
    }

    #[test]
    fn test_detect_encoding_utf8_first() {
        assert_eq!(detect_encoding("Société,Ville\n".as_bytes()), "utf-8");
        assert_eq!(detect_encoding(b""), "utf-8");
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = "\u{feff}Date,Value\n2020-01-01,1\n".as_bytes();
        let result = parse_bytes_auto(bytes).unwrap();
        assert_eq!(result.table.headers[0], "Date");
    }

    #[test]
    fn test_write_quotes_when_needed() {
        let table = Table {
            headers: vec!["day".into(), "Note".into()],
            rows: vec![vec!["1".into(), "a, b".into()]],
        };
        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "day,Note\n1,\"a, b\"\n");
    }

    #[test]
    fn test_file_roundtrip_keeps_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, "Date,Price\n2020-01-01,10.50\n").unwrap();

        let parsed = read_table(&path).unwrap();
        assert_eq!(parsed.encoding, "utf-8");
        write_table_file(&path, &parsed.table).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Date,Price\n2020-01-01,10.50\n"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_table(dir.path().join("nope.csv"));
        assert!(matches!(result, Err(CsvError::Io(_))));
    }
}
