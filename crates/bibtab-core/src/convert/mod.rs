//! Conversions between the record and row models

mod to_database;
mod to_table;

use serde::{Deserialize, Serialize};

pub use to_database::{row_to_record, to_database};
pub use to_table::{normalize_keywords, record_to_row, to_table, validate_table};

/// Options for the record -> row direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Replace keys with `<Name><year>` where possible
    pub rename_keys: bool,
    /// Sort rows by `entry_key` before output
    pub sort_by_key: bool,
    /// Warn about values that contain this character
    #[serde(skip)]
    pub delimiter_check: Option<char>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            rename_keys: true,
            sort_by_key: false,
            delimiter_check: None,
        }
    }
}

impl TableOptions {
    pub fn with_rename_keys(mut self, rename_keys: bool) -> Self {
        self.rename_keys = rename_keys;
        self
    }

    pub fn with_sort_by_key(mut self, sort_by_key: bool) -> Self {
        self.sort_by_key = sort_by_key;
        self
    }

    pub fn with_delimiter_check(mut self, delimiter: char) -> Self {
        self.delimiter_check = Some(delimiter);
        self
    }
}
