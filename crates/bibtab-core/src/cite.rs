//! Citation list and LaTeX fragment

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::record::Database;

const CITE_PREFIX: &str = "\\nocite{";
const CITE_SUFFIX: &str = "}";

/// `\nocite{A,B,C}` over every key in database order
pub fn build_cite_list(database: &Database) -> String {
    let keys = database.keys().collect::<Vec<_>>().join(",");
    format!("{}{}{}", CITE_PREFIX, keys, CITE_SUFFIX)
}

/// Name a `\bibliography{...}` line expects: the file stem of `path`
pub fn bibliography_basename(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Fill-in values for the document fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentTemplate {
    pub document_class: String,
    pub title: String,
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            title: "References".to_string(),
        }
    }
}

impl DocumentTemplate {
    /// One component per line, LF-terminated
    pub fn render(&self, cite_list: &str, bibliography_basename: &str) -> String {
        [
            format!("\\documentclass{{{}}}", self.document_class),
            format!("\\title{{{}}}", self.title),
            "\\begin{document}".to_string(),
            cite_list.to_string(),
            format!("\\bibliography{{{}}}", bibliography_basename),
            "\\end{document}".to_string(),
        ]
        .iter()
        .map(|line| format!("{}\n", line))
        .collect()
    }

    pub fn write(&self, path: &Path, cite_list: &str, bibliography_basename: &str) -> Result<()> {
        std::fs::write(path, self.render(cite_list, bibliography_basename))?;
        tracing::info!("Wrote LaTeX fragment '{}'", path.display());
        Ok(())
    }
}

/// Write the fragment with the default template
pub fn write_fragment(path: &Path, cite_list: &str, bibliography_basename: &str) -> Result<()> {
    DocumentTemplate::default().write(path, cite_list, bibliography_basename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_cite_list_order_and_no_trailing_comma() {
        let mut db = Database::new();
        for key in ["A", "B", "C"] {
            db.insert(Record::new(key, "misc"));
        }
        assert_eq!(build_cite_list(&db), "\\nocite{A,B,C}");
    }

    #[test]
    fn test_empty_cite_list() {
        assert_eq!(build_cite_list(&Database::new()), "\\nocite{}");
    }

    #[test]
    fn test_basename_drops_extension() {
        assert_eq!(bibliography_basename(Path::new("/tmp/out/refs.bib")), "refs");
        assert_eq!(bibliography_basename(Path::new("refs")), "refs");
    }

    #[test]
    fn test_render_lines() {
        let text = DocumentTemplate::default().render("\\nocite{A}", "refs");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "\\documentclass{article}",
                "\\title{References}",
                "\\begin{document}",
                "\\nocite{A}",
                "\\bibliography{refs}",
                "\\end{document}",
            ]
        );
        assert!(text.ends_with("\\end{document}\n"));
    }
}
