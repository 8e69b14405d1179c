// file: src/repository/classifier.rs
// description: category extraction for scanned papers
// reference: path-based classification

use std::path::Path;

pub struct FileClassifier;

impl FileClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Category of a paper is the name of the directory holding it.
    /// Returns an empty string when the path has no named parent.
    pub fn category_for(&self, path: &Path) -> String {
        path.parent()
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new()
    }
}
