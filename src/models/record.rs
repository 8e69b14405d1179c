// file: src/models/record.rs
// description: processed paper record written to the intermediate jsonl file
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One processed document, serialized as a single JSONL line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub filename: String,
    pub path: String,
    pub text: String,
    pub category: String,
}

impl PaperRecord {
    pub fn new(path: &Path, text: String, category: String) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            filename,
            path: path.display().to_string(),
            text,
            category,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Copy of this record with every non-ASCII character dropped from `text`.
    pub fn ascii_only(&self) -> Self {
        Self {
            text: self.text.chars().filter(char::is_ascii).collect(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Pdf,
    Markdown,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}
