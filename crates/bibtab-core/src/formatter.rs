//! BibTeX formatting module
//!
//! Converts records back to BibTeX text. Fields whose value is empty are
//! not written.

use std::path::Path;

use crate::error::Result;
use crate::record::{Database, Record};

/// Format a single record
pub fn format_record(record: &Record) -> String {
    let mut result = String::new();

    result.push('@');
    result.push_str(&record.entry_type);
    result.push('{');
    result.push_str(&record.key);
    result.push(',');
    result.push('\n');

    let persons = record.person_roles().map(|(role, persons)| {
        let value = persons
            .iter()
            .map(|p| p.to_bibtex_format())
            .collect::<Vec<_>>()
            .join(" and ");
        (role.to_string(), value)
    });
    let fields = record
        .fields()
        .iter()
        .map(|f| (f.name.clone(), f.value.clone()));

    for (name, value) in persons.chain(fields) {
        if value.is_empty() {
            continue;
        }
        result.push_str("    ");
        result.push_str(&name);
        result.push_str(" = ");
        result.push_str(&format_field_value(&value));
        result.push(',');
        result.push('\n');
    }

    result.push('}');
    result
}

/// Format every record of a database, separated by blank lines
pub fn format_database(database: &Database) -> String {
    let mut result = database
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

/// Render the database and write it in one go
pub fn write_file(path: &Path, database: &Database) -> Result<()> {
    std::fs::write(path, format_database(database))?;
    tracing::info!("Wrote {} entries to '{}'", database.len(), path.display());
    Ok(())
}

/// Whether every `{` in `value` has a matching `}`. Escaped braces
/// (`\{`, `\}`) are not counted.
pub fn braces_balanced(value: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Numbers go bare, everything else in braces
fn format_field_value(value: &str) -> String {
    if value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Person;

    #[test]
    fn test_format_simple_record() {
        let mut record = Record::new("Smith2024", "article");
        record.add_person("author", Person::new("Smith").with_first("John"));
        record.set_field("title", "A Great Paper");
        record.set_field("year", "2024");

        let formatted = format_record(&record);
        assert!(formatted.starts_with("@article{Smith2024,\n"));
        assert!(formatted.contains("    author = {Smith, John},\n"));
        assert!(formatted.contains("    title = {A Great Paper},\n"));
        assert!(formatted.contains("    year = 2024,\n"));
        assert!(formatted.ends_with('}'));
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let mut record = Record::new("Doe2019", "article");
        record.set_field("title", "T");
        record.set_field("year", "");

        let formatted = format_record(&record);
        assert!(!formatted.contains("year"));
    }

    #[test]
    fn test_braces_balanced() {
        assert!(braces_balanced("A {B}ook about {LaTeX}"));
        assert!(braces_balanced(r"100\% \{literal"));
        assert!(!braces_balanced("Open {brace"));
        assert!(!braces_balanced("Close} {brace"));
    }

    #[test]
    fn test_format_database_separates_entries() {
        let mut db = Database::new();
        db.insert(Record::new("A", "misc"));
        db.insert(Record::new("B", "misc"));

        assert_eq!(format_database(&db), "@misc{A,\n}\n\n@misc{B,\n}\n");
        assert_eq!(format_database(&Database::new()), "");
    }
}
