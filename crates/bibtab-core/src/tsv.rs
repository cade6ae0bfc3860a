//! Delimited-text reader and writer
//!
//! Header row first, one record per line. Cells are quoted with
//! [`TableFormat::quote`] only when needed.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::error::{BibtabError, Result};
use crate::table::{Row, Table, ENTRY_KEY, ENTRY_TYPE};

/// Delimiter and quote character of the table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    pub delimiter: char,
    pub quote: char,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            quote: '\'',
        }
    }
}

impl TableFormat {
    /// Builder method to change the quote character
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Both characters as single bytes, as the csv crate needs them
    fn bytes(&self) -> Result<(u8, u8)> {
        let byte = |c: char, what: &str| {
            u8::try_from(c)
                .ok()
                .filter(u8::is_ascii)
                .ok_or_else(|| BibtabError::InvalidFormat(format!("{} {:?} is not ASCII", what, c)))
        };
        let delimiter = byte(self.delimiter, "delimiter")?;
        let quote = byte(self.quote, "quote character")?;
        if delimiter == quote {
            return Err(BibtabError::InvalidFormat(
                "delimiter and quote character must differ".to_string(),
            ));
        }
        Ok((delimiter, quote))
    }
}

/// Read a table from any reader. Short rows are padded with `""`.
pub fn read_table<R: Read>(reader: R, format: &TableFormat) -> Result<Table> {
    let (delimiter, quote) = format.bytes()?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    for required in [ENTRY_KEY, ENTRY_TYPE] {
        if !headers.iter().any(|h| h == required) {
            return Err(BibtabError::MissingColumn(required.to_string()));
        }
    }

    let mut table = Table::new(headers.as_slice());
    for result in reader.records() {
        let record = result?;
        let mut row = Row::new();
        for (i, column) in headers.iter().enumerate() {
            row.set(column, record.get(i).unwrap_or(""));
        }
        table.push(row);
    }

    Ok(table)
}

/// Parse a table from a string
pub fn parse_table(input: &str, format: &TableFormat) -> Result<Table> {
    read_table(input.as_bytes(), format)
}

/// Render a table, columns in table order, LF line endings
pub fn format_table(table: &Table, format: &TableFormat) -> Result<String> {
    let (delimiter, quote) = format.bytes()?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(table.columns().iter().map(|c| row.get(c)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| BibtabError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| BibtabError::InvalidFormat(e.to_string()))
}

/// Read a table file
pub fn read_file(path: &Path, format: &TableFormat) -> Result<Table> {
    if !path.is_file() {
        return Err(BibtabError::MissingInput(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let table = read_table(std::io::BufReader::new(file), format)?;
    tracing::info!("Read '{}': found {} reference(s)", path.display(), table.len());
    Ok(table)
}

/// Render the table and write it in one go
pub fn write_file(path: &Path, table: &Table, format: &TableFormat) -> Result<()> {
    std::fs::write(path, format_table(table, format)?)?;
    tracing::info!("Wrote {} rows to '{}'", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_pads_short_rows() {
        let input = "entry_key\tentry_type\ttitle\nA\tmisc\n";
        let table = parse_table(input, &TableFormat::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get("title"), "");
        assert_eq!(table.rows()[0].entry_type(), "misc");
    }

    #[test]
    fn test_single_quote_default() {
        let input = "entry_key\tentry_type\ttitle\nA\tmisc\t'Tabs\tinside'\n";
        let table = parse_table(input, &TableFormat::default()).unwrap();
        assert_eq!(table.rows()[0].get("title"), "Tabs\tinside");
    }

    #[test]
    fn test_double_quote_option() {
        let format = TableFormat::default().with_quote('"');
        let input = "entry_key\tentry_type\ttitle\nA\tmisc\t\"It's\tquoted\"\n";
        let table = parse_table(input, &format).unwrap();
        assert_eq!(table.rows()[0].get("title"), "It's\tquoted");
    }

    #[test]
    fn test_missing_entry_type_column() {
        let err = parse_table("entry_key\ttitle\nA\tT\n", &TableFormat::default()).unwrap_err();
        assert!(matches!(err, BibtabError::MissingColumn(c) if c == "entry_type"));
    }

    #[test]
    fn test_format_quotes_only_when_needed() {
        let mut table = Table::new(&["entry_key", "entry_type", "title"]);
        table.push(
            Row::new()
                .with("entry_key", "A")
                .with("entry_type", "misc")
                .with("title", "O'Brien"),
        );
        let text = format_table(&table, &TableFormat::default()).unwrap();
        assert_eq!(text, "entry_key\tentry_type\ttitle\nA\tmisc\t'O''Brien'\n");
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let format = TableFormat::default().with_delimiter('§');
        assert!(matches!(
            format_table(&Table::default(), &format),
            Err(BibtabError::InvalidFormat(_))
        ));
    }
}
