//! Record -> row transform

use std::collections::HashSet;

use super::TableOptions;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::keys::normalize;
use crate::person::render_persons;
use crate::record::{Database, Record};
use crate::schema::Schema;
use crate::table::{Row, Table, COLUMNS, ENTRY_KEY, ENTRY_TYPE};

/// Convert a database into a table with the fixed column set.
///
/// Diagnostics come back in source order: per-row notes first (duplicate
/// keys, delimiters in values), then the validation pass.
pub fn to_table(
    database: &Database,
    schema: &Schema,
    options: &TableOptions,
) -> (Table, Vec<Diagnostic>) {
    let mut table = Table::with_standard_columns();
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();

    for record in database {
        let row = record_to_row(record, options.rename_keys);

        if !seen.insert(row.entry_key().to_string()) {
            diagnostics.push(Diagnostic::new(row.entry_key(), DiagnosticKind::DuplicateKey));
        }
        if let Some(delimiter) = options.delimiter_check {
            for (column, value) in row.cells() {
                if value.contains(delimiter) {
                    diagnostics.push(Diagnostic::new(
                        row.entry_key(),
                        DiagnosticKind::DelimiterInValue {
                            field: column.to_string(),
                            delimiter,
                        },
                    ));
                }
            }
        }

        table.push(row);
    }

    diagnostics.extend(validate_table(&table, schema));

    if options.sort_by_key {
        table.sort_by_key();
    }

    (table, diagnostics)
}

/// Build the row for one record
pub fn record_to_row(record: &Record, rename_keys: bool) -> Row {
    let entry_key = if rename_keys {
        let key = normalize(record);
        if key != record.key {
            tracing::debug!("Re-keying '{}' -> '{}'", record.key, key);
        }
        key
    } else {
        record.key.clone()
    };

    let mut row = Row::new();
    for &column in COLUMNS {
        let value = match column {
            ENTRY_KEY => entry_key.clone(),
            ENTRY_TYPE => record.entry_type.clone(),
            // Pre-rename key, so old citations can be mapped to new ones
            "key" => record.key.clone(),
            "author" | "editor" => person_cell(record, column),
            "keywords" => normalize_keywords(record.get_field("keywords").unwrap_or("")),
            "abstract" => abstract_text(record).unwrap_or("").to_string(),
            _ => record.get_field(column).unwrap_or("").to_string(),
        };
        row.set(column, value);
    }
    row
}

/// Warn about unknown types and empty required fields
pub fn validate_table(table: &Table, schema: &Schema) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for row in table.rows() {
        let entry_type = row.entry_type();
        if !schema.is_known(entry_type) {
            diagnostics.push(Diagnostic::unrecognized_type(
                row.entry_key(),
                entry_type,
                false,
            ));
            continue;
        }
        for field in schema.required_fields(entry_type) {
            if row.get(field).is_empty() {
                diagnostics.push(Diagnostic::missing_field(row.entry_key(), field));
            }
        }
    }

    diagnostics
}

/// Lowercase, trim, drop empties and sort comma-separated keywords.
/// Duplicates are kept.
pub fn normalize_keywords(raw: &str) -> String {
    let mut keywords: Vec<String> = raw
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    keywords.sort();
    keywords.join(", ")
}

/// Structured persons when present, else a flat field of the same name
fn person_cell(record: &Record, role: &str) -> String {
    let persons = record.persons(role);
    if persons.is_empty() {
        record.get_field(role).unwrap_or("").to_string()
    } else {
        render_persons(persons)
    }
}

fn abstract_text(record: &Record) -> Option<&str> {
    record
        .get_field("abstract")
        .or_else(|| record.get_field("abstractNote"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Person;

    #[test]
    fn test_normalize_keywords() {
        assert_eq!(
            normalize_keywords("NLP, Machine Learning,  nlp "),
            "machine learning, nlp, nlp"
        );
        assert_eq!(normalize_keywords("nlp, nlp"), "nlp, nlp");
        assert_eq!(normalize_keywords(" , ,"), "");
        assert_eq!(normalize_keywords(""), "");
    }

    #[test]
    fn test_abstract_fallback() {
        let mut record = Record::new("A", "misc");
        record.set_field("abstractNote", "from zotero");
        assert_eq!(record_to_row(&record, false).get("abstract"), "from zotero");

        record.set_field("abstract", "preferred");
        assert_eq!(record_to_row(&record, false).get("abstract"), "preferred");
    }

    #[test]
    fn test_row_has_every_column_in_order() {
        let row = record_to_row(&Record::new("A", "misc"), false);
        let columns: Vec<_> = row.cells().map(|(c, _)| c).collect();
        assert_eq!(columns, COLUMNS);
        assert_eq!(row.get("key"), "A");
        assert!(row
            .cells()
            .skip(2)
            .filter(|(c, _)| *c != "key")
            .all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn test_persons_flattened() {
        let mut record = Record::new("A", "book");
        record.add_person("author", Person::parse("John Smith"));
        record.add_person("author", Person::parse("Doe, Jane Q."));
        record.add_person("editor", Person::parse("Ann Miller"));

        let row = record_to_row(&record, false);
        assert_eq!(row.get("author"), "John Smith  and  Jane Q. Doe");
        assert_eq!(row.get("editor"), "Ann Miller");
    }

    #[test]
    fn test_rename_keys() {
        let mut record = Record::new("orig", "article");
        record.add_person("author", Person::parse("John Smith"));
        record.set_field("year", "2020");

        let renamed = record_to_row(&record, true);
        assert_eq!(renamed.entry_key(), "Smith2020");
        assert_eq!(renamed.get("key"), "orig");
        assert_eq!(record_to_row(&record, false).entry_key(), "orig");
    }

    #[test]
    fn test_unknown_type_skips_field_checks() {
        let mut db = Database::new();
        db.insert(Record::new("W", "online"));
        let (table, diagnostics) = to_table(&db, Schema::standard(), &TableOptions::default());

        assert_eq!(table.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::UnrecognizedEntryType { excluded: false, .. }
        ));
    }

    #[test]
    fn test_delimiter_check() {
        let mut record = Record::new("A", "misc");
        record.set_field("note", "has\ttab");
        let mut db = Database::new();
        db.insert(record);

        let options = TableOptions::default().with_delimiter_check('\t');
        let (_, diagnostics) = to_table(&db, Schema::standard(), &options);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field(), Some("note"));
    }
}
