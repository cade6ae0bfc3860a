//! Row -> record transform
//!
//! `author` and `editor` are not split back into persons; the flat cell text
//! is stored as a plain field of the same name.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::formatter::braces_balanced;
use crate::record::{Database, Record};
use crate::schema::Schema;
use crate::table::{Row, Table, ENTRY_KEY, ENTRY_TYPE};

/// Convert table rows back into a database.
///
/// Rows with an unrecognized `entry_type` are left out. A later row with an
/// already used key replaces the earlier entry in place.
pub fn to_database(table: &Table, schema: &Schema) -> (Database, Vec<Diagnostic>) {
    let mut database = Database::new();
    let mut diagnostics = Vec::new();

    for row in table.rows() {
        let Some(record) = row_to_record(row, table.columns(), schema, &mut diagnostics) else {
            continue;
        };
        let key = record.key.clone();
        if database.insert(record).is_some() {
            diagnostics.push(Diagnostic::new(key, DiagnosticKind::DuplicateKey));
        }
    }

    (database, diagnostics)
}

/// Build the record for one row, or `None` when its type is unknown
pub fn row_to_record(
    row: &Row,
    columns: &[String],
    schema: &Schema,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Record> {
    let entry_key = row.entry_key();
    let entry_type = row.entry_type().trim().to_lowercase();

    if !schema.is_known(&entry_type) {
        diagnostics.push(Diagnostic::unrecognized_type(
            entry_key,
            row.entry_type(),
            true,
        ));
        return None;
    }

    let mut record = Record::new(entry_key, &entry_type);
    let required = schema.required_fields(&entry_type);
    let optional = schema.optional_fields(&entry_type);

    // Empty required values are kept so the field stays present
    for field in required {
        let value = row.get(field);
        if value.is_empty() {
            diagnostics.push(Diagnostic::missing_field(entry_key, field));
        }
        record.set_field(field, value);
    }

    for field in optional {
        let value = row.get(field);
        if columns.contains(field) && !value.is_empty() {
            record.set_field(field, value);
        }
    }

    for column in columns {
        let classified = column == ENTRY_KEY
            || column == ENTRY_TYPE
            || required.contains(column)
            || optional.contains(column);
        let value = row.get(column);
        if !classified && !value.is_empty() {
            record.set_field(column, value);
        }
    }

    for field in record.fields() {
        if !braces_balanced(&field.value) {
            diagnostics.push(Diagnostic::new(
                entry_key,
                DiagnosticKind::UnbalancedBraces {
                    field: field.name.clone(),
                },
            ));
        }
    }

    Some(record)
}
