//! Cite key normalization
//!
//! Builds `<Name><year>` keys from the primary person of a record:
//! first author, else first editor, else an organizational field.

use lazy_static::lazy_static;
use regex::Regex;

use crate::record::Record;

/// Name used when a record has no author, editor or organization
pub const PLACEHOLDER_NAME: &str = "Anonymous";

/// Fields consulted, in order, when a record has no persons
pub const ORGANIZATION_FIELDS: [&str; 2] = ["organization", "institution"];

lazy_static! {
    /// Period, comma, hyphen, whitespace, braces and the \" and \' accent escapes
    static ref STRIP: Regex = Regex::new(r#"[.,\-\s{}]|\\["']"#).expect("valid strip pattern");
}

/// Name segment a record's key would be derived from
pub fn primary_name(record: &Record) -> String {
    let person = record
        .persons("author")
        .first()
        .or_else(|| record.persons("editor").first());
    if let Some(person) = person {
        let last = person.last_name();
        if !last.is_empty() {
            return last;
        }
    }

    ORGANIZATION_FIELDS
        .iter()
        .filter_map(|field| record.get_field(field))
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

/// Derive a normalized key for `record`.
///
/// Returns the original key when the record has no year or no usable name.
pub fn normalize(record: &Record) -> String {
    let year = record.year().unwrap_or("").trim();
    let name = primary_name(record);

    if year.is_empty() || name == PLACEHOLDER_NAME {
        return record.key.clone();
    }

    format!("{}{}", STRIP.replace_all(&name, ""), year)
}
