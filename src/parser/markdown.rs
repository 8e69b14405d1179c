// file: src/parser/markdown.rs
// description: markdown source reading for the plain text corpus
// reference: https://doc.rust-lang.org/std/fs/fn.read_to_string.html

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub struct MarkdownReader;

impl MarkdownReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| PipelineError::file(path, source))
    }

    /// Returns the file content unchanged, or an empty string when the file
    /// cannot be read as UTF-8.
    pub fn extract(&self, path: &Path) -> String {
        match self.read(path) {
            Ok(content) => {
                info!(
                    "Successfully extracted text from markdown file: {}",
                    path.display()
                );
                content
            }
            Err(e) => {
                error!(
                    "Error extracting text from markdown file {}: {}",
                    path.display(),
                    e
                );
                String::new()
            }
        }
    }
}

impl Default for MarkdownReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_extract_returns_exact_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        let content = "# Scaling Laws\n\n*  loss ∝ N^-α  \n\n\n";
        fs::write(&path, content).unwrap();

        assert_eq!(MarkdownReader::new().extract(&path), content);
    }

    #[test]
    fn test_extract_invalid_utf8_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.md");
        fs::write(&path, [0x23, 0x20, 0xff, 0xfe, 0x0a]).unwrap();

        assert_eq!(MarkdownReader::new().extract(&path), "");
    }

    #[test]
    fn test_extract_missing_file_is_empty() {
        assert_eq!(
            MarkdownReader::new().extract(Path::new("/nonexistent/notes.md")),
            ""
        );
    }
}
