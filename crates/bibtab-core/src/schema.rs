//! Entry-type schema
//!
//! Maps each recognized BibTeX entry type to its required and optional
//! fields. Field lists follow the classic BibTeX definitions
//! (https://www.openoffice.org/bibliographic/bibtex-defs.html).

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required and optional fields of one entry type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFields {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

/// Immutable table of entry types, passed to every transform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    types: BTreeMap<String, TypeFields>,
}

lazy_static! {
    static ref STANDARD: Schema = {
        let table: &[(&str, &[&str], &[&str])] = &[
            (
                "article",
                &["author", "title", "journal", "year"],
                &["volume", "number", "pages", "month", "note"],
            ),
            (
                "book",
                &["author", "editor", "title", "publisher", "year"],
                &["volume", "number", "series", "address", "edition", "month", "note"],
            ),
            (
                "booklet",
                &["title"],
                &["author", "howpublished", "address", "month", "year", "note"],
            ),
            (
                "conference",
                &["author", "title", "booktitle", "year"],
                &[
                    "editor", "volume", "number", "series", "pages", "address", "month",
                    "organization", "publisher", "note",
                ],
            ),
            (
                "inbook",
                &["author", "editor", "title", "chapter", "pages", "publisher", "year"],
                &["volume", "number", "series", "type", "address", "edition", "month", "note"],
            ),
            (
                "incollection",
                &["author", "title", "booktitle", "publisher", "year"],
                &[
                    "editor", "volume", "number", "series", "type", "chapter", "pages",
                    "address", "edition", "month", "note",
                ],
            ),
            (
                "inproceedings",
                &["author", "title", "booktitle", "year"],
                &[
                    "editor", "volume", "number", "series", "pages", "address", "month",
                    "organization", "publisher", "note",
                ],
            ),
            (
                "manual",
                &["title"],
                &["author", "organization", "address", "edition", "month", "year", "note"],
            ),
            (
                "mastersthesis",
                &["author", "title", "school", "year"],
                &["type", "address", "month", "note"],
            ),
            (
                "misc",
                &[],
                &["author", "title", "howpublished", "month", "year", "note"],
            ),
            (
                "phdthesis",
                &["author", "title", "school", "year"],
                &["type", "address", "month", "note"],
            ),
            (
                "proceedings",
                &["title", "year"],
                &[
                    "editor", "volume", "number", "series", "address", "month",
                    "organization", "publisher", "note",
                ],
            ),
            (
                "techreport",
                &["author", "title", "institution", "year"],
                &["type", "number", "address", "month", "note"],
            ),
            (
                "unpublished",
                &["author", "title", "note"],
                &["month", "year"],
            ),
        ];

        table
            .iter()
            .fold(Schema::new(), |schema, &(name, required, optional)| {
                schema.with_type(name, required, optional)
            })
    };
}

impl Schema {
    /// Create an empty schema (every type unrecognized)
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard 14-type BibTeX schema
    pub fn standard() -> &'static Schema {
        &STANDARD
    }

    /// Builder method to add (or replace) an entry type.
    ///
    /// Optional names that also appear in `required` are dropped so the two
    /// lists never overlap.
    pub fn with_type<S: AsRef<str>>(mut self, name: &str, required: &[S], optional: &[S]) -> Self {
        let required: Vec<String> = required.iter().map(|f| f.as_ref().to_lowercase()).collect();
        let optional = optional
            .iter()
            .map(|f| f.as_ref().to_lowercase())
            .filter(|f| !required.contains(f))
            .collect();

        self.types
            .insert(name.to_lowercase(), TypeFields { required, optional });
        self
    }

    /// Whether `entry_type` is a recognized type
    pub fn is_known(&self, entry_type: &str) -> bool {
        self.types.contains_key(entry_type)
    }

    /// Required fields of `entry_type`, empty for unknown types
    pub fn required_fields(&self, entry_type: &str) -> &[String] {
        self.types
            .get(entry_type)
            .map(|t| t.required.as_slice())
            .unwrap_or(&[])
    }

    /// Optional fields of `entry_type`, empty for unknown types
    pub fn optional_fields(&self, entry_type: &str) -> &[String] {
        self.types
            .get(entry_type)
            .map(|t| t.optional.as_slice())
            .unwrap_or(&[])
    }

    /// Recognized type names in lexicographic order
    pub fn entry_types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Every field named by any type, deduplicated, in first-seen order
    pub fn all_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for type_fields in self.types.values() {
            for field in type_fields.required.iter().chain(&type_fields.optional) {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
        }
        fields
    }
}
