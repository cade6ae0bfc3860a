//! Configuration for bibtab
//!
//! Loaded from TOML. Every section and key is optional:
//!
//! ```toml
//! [table]
//! delimiter = "\t"
//! quote = "'"
//!
//! [convert]
//! rename_keys = true
//! sort_by_key = false
//!
//! [document]
//! document_class = "article"
//! title = "References"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cite::DocumentTemplate;
use crate::convert::TableOptions;
use crate::error::Result;
use crate::tsv::TableFormat;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibtabConfig {
    /// Table delimiter and quote character
    pub table: TableFormat,
    /// Record -> row options
    pub convert: TableOptions,
    /// LaTeX fragment template
    pub document: DocumentTemplate,
}

impl BibtabConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// `<config dir>/bibtab/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bibtab").join("config.toml"))
    }

    /// Explicit path if given, else the default path if it exists, else
    /// defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
