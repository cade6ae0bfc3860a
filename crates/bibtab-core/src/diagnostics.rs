//! Conversion warnings
//!
//! Warnings never stop a conversion. They are collected and handed back to
//! the caller next to the converted data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a warning is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Entry type not present in the schema
    UnrecognizedEntryType { entry_type: String, excluded: bool },
    /// A required field resolved to the empty string
    MissingRequiredField { field: String },
    /// More than one entry produced the same key
    DuplicateKey,
    /// A value contains the table cell delimiter
    DelimiterInValue { field: String, delimiter: char },
    /// A value would produce unreadable BibTeX
    UnbalancedBraces { field: String },
}

/// A warning attached to one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub entry_key: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(entry_key: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            entry_key: entry_key.into(),
            kind,
        }
    }

    pub fn unrecognized_type(entry_key: &str, entry_type: &str, excluded: bool) -> Self {
        Self::new(
            entry_key,
            DiagnosticKind::UnrecognizedEntryType {
                entry_type: entry_type.to_string(),
                excluded,
            },
        )
    }

    pub fn missing_field(entry_key: &str, field: &str) -> Self {
        Self::new(
            entry_key,
            DiagnosticKind::MissingRequiredField {
                field: field.to_string(),
            },
        )
    }

    /// Field name the warning refers to, if any
    pub fn field(&self) -> Option<&str> {
        match &self.kind {
            DiagnosticKind::MissingRequiredField { field }
            | DiagnosticKind::DelimiterInValue { field, .. }
            | DiagnosticKind::UnbalancedBraces { field } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}): ", self.entry_key)?;
        match &self.kind {
            DiagnosticKind::UnrecognizedEntryType {
                entry_type,
                excluded,
            } => {
                write!(f, "'{}' is not a recognized bibtex entry type", entry_type)?;
                if *excluded {
                    write!(f, " (ignored)")?;
                }
                Ok(())
            }
            DiagnosticKind::MissingRequiredField { field } => {
                write!(f, "required field '{}' is empty", field)
            }
            DiagnosticKind::DuplicateKey => write!(f, "entry key is used more than once"),
            DiagnosticKind::DelimiterInValue { field, delimiter } => write!(
                f,
                "field '{}' contains the cell delimiter {:?}",
                field, delimiter
            ),
            DiagnosticKind::UnbalancedBraces { field } => {
                write!(f, "field '{}' has unbalanced braces", field)
            }
        }
    }
}

/// Serialize diagnostics as a JSON report
pub fn to_json(diagnostics: &[Diagnostic]) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(diagnostics)?)
}
