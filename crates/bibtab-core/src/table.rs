//! Row-oriented bibliography model
//!
//! Every cell is a string. A missing cell reads as `""`, never as null.

use serde::{Deserialize, Serialize};

pub const ENTRY_KEY: &str = "entry_key";
pub const ENTRY_TYPE: &str = "entry_type";

/// Fixed output column order
pub const COLUMNS: &[&str] = &[
    ENTRY_KEY,
    ENTRY_TYPE,
    "keywords",
    "title",
    "author",
    "journal",
    "booktitle",
    "url",
    "doi",
    "year",
    "month",
    "publisher",
    "organization",
    "school",
    "institution",
    "volume",
    "number",
    "pages",
    "chapter",
    "edition",
    "series",
    "type",
    "editor",
    "address",
    "annote",
    "crossref",
    "howpublished",
    "key",
    "note",
    "eprint",
    "biburl",
    "isbn",
    "abstract",
];

/// One tabular record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a cell
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a cell, replacing an existing value in the same column
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| c == column) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    /// Cell value, `""` when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(c, _)| c == column)
    }

    pub fn entry_key(&self) -> &str {
        self.get(ENTRY_KEY)
    }

    pub fn entry_type(&self) -> &str {
        self.get(ENTRY_TYPE)
    }

    /// Cells in insertion order
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

/// Header plus rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Empty table with the fixed [`COLUMNS`]
    pub fn with_standard_columns() -> Self {
        Self::new(COLUMNS)
    }

    /// Append a row. Every column of the table reads as `""` in the row
    /// unless set.
    pub fn push(&mut self, mut row: Row) {
        for column in &self.columns {
            if !row.has_column(column) {
                row.set(column, "");
            }
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sort rows by `entry_key` (plain string order, stable)
    pub fn sort_by_key(&mut self) {
        self.rows.sort_by(|a, b| a.entry_key().cmp(b.entry_key()));
    }
}
