// file: src/repository/scanner.rs
// description: Directory walking and source document discovery with filtering
// reference: https://docs.rs/walkdir

use crate::config::ScanConfig;
use crate::error::Result;
use crate::models::SourceKind;
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct FileScanner {
    config: ScanConfig,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub kind: SourceKind,
    pub size: u64,
}

impl FileScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Recursively collects files of the requested kinds under `root`.
    /// PDFs are returned before Markdown files, each group ordered by path.
    pub fn scan_directory(&self, root: &Path, kinds: &[SourceKind]) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());

        let max_size = (self.config.max_file_size_mb as u64) * 1024 * 1024;
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            let Some(kind) = SourceKind::from_path(path) else {
                continue;
            };

            if !kinds.contains(&kind) {
                continue;
            }

            if self.should_skip(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if max_size > 0 && size > max_size {
                debug!(
                    "Skipping large file ({} MB): {}",
                    size / 1024 / 1024,
                    path.display()
                );
                continue;
            }

            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string();

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative_path,
                kind,
                size,
            });
        }

        files.sort_by(|a, b| {
            kind_rank(a.kind)
                .cmp(&kind_rank(b.kind))
                .then_with(|| a.path.cmp(&b.path))
        });

        let pdf_count = files.iter().filter(|f| f.kind == SourceKind::Pdf).count();
        info!(
            "Found {} PDF files and {} Markdown files",
            pdf_count,
            files.len() - pdf_count
        );

        Ok(files)
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.config.skip_patterns {
            if let Some(suffix) = pattern.strip_prefix('*') {
                if path_str.ends_with(suffix) {
                    return true;
                }
            } else if path_str.contains(pattern.as_str()) {
                return true;
            }
        }

        false
    }
}

fn kind_rank(kind: SourceKind) -> u8 {
    match kind {
        SourceKind::Pdf => 0,
        SourceKind::Markdown => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> ScanConfig {
        ScanConfig {
            skip_patterns: vec![],
            max_file_size_mb: 10,
        }
    }

    #[test]
    fn test_scan_directory_finds_all_kinds_recursively() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nlp")).unwrap();
        fs::write(temp.path().join("notes.md"), "# Notes").unwrap();
        fs::write(temp.path().join("nlp/guide.markdown"), "guide").unwrap();
        fs::write(temp.path().join("nlp/paper.pdf"), b"%PDF-1.4").unwrap();
        fs::write(temp.path().join("ignored.txt"), "nope").unwrap();

        let scanner = FileScanner::new(test_config());
        let files = scanner
            .scan_directory(temp.path(), &[SourceKind::Pdf, SourceKind::Markdown])
            .unwrap();

        let relative: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(relative, vec!["nlp/paper.pdf", "nlp/guide.markdown", "notes.md"]);
        assert_eq!(files[0].kind, SourceKind::Pdf);
    }

    #[test]
    fn test_scan_directory_filters_kinds() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "a").unwrap();
        fs::write(temp.path().join("b.pdf"), b"%PDF-1.4").unwrap();

        let scanner = FileScanner::new(test_config());
        let files = scanner
            .scan_directory(temp.path(), &[SourceKind::Pdf])
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "b.pdf");
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let scanner = FileScanner::new(test_config());
        let result = scanner.scan_directory(Path::new("/nonexistent/papers"), &[SourceKind::Pdf]);
        assert!(result.is_err());
    }

    #[test]
    fn test_skip_patterns() {
        let config = ScanConfig {
            skip_patterns: vec!["*.draft.md".to_string(), ".git/".to_string()],
            max_file_size_mb: 10,
        };

        let scanner = FileScanner::new(config);

        assert!(scanner.should_skip(Path::new("paper.draft.md")));
        assert!(scanner.should_skip(Path::new("repo/.git/readme.md")));
        assert!(!scanner.should_skip(Path::new("paper.md")));
    }
}
