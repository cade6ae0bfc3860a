//! BibTeX <-> table conversion
//!
//! This crate round-trips bibliography entries through a delimited-text
//! table that a spreadsheet can edit, then regenerates BibTeX and a small
//! LaTeX fragment citing every entry.
//!
//! Features:
//! - Nom-based BibTeX reader and a matching writer
//! - Entry-type schema with required/optional fields
//! - `<Name><year>` cite key normalization
//! - Record -> row and row -> record transforms with collected warnings
//! - Tab-separated table I/O with a configurable quote character
//! - `\nocite{...}` list and LaTeX fragment output

pub mod cite;
pub mod config;
pub mod convert;
pub mod diagnostics;
mod error;
pub mod formatter;
pub mod keys;
pub mod parser;
pub mod person;
pub mod record;
pub mod schema;
pub mod table;
pub mod tsv;

pub use cite::{bibliography_basename, build_cite_list, write_fragment, DocumentTemplate};
pub use config::BibtabConfig;
pub use convert::{normalize_keywords, to_database, to_table, validate_table, TableOptions};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{BibtabError, Result};
pub use formatter::{braces_balanced, format_database, format_record};
pub use keys::normalize;
pub use parser::{parse, parse_document, ParseError, ParseIssue, ParseResult};
pub use person::{render_persons, Person};
pub use record::{Database, Field, Record};
pub use schema::Schema;
pub use table::{Row, Table, COLUMNS};
pub use tsv::TableFormat;
