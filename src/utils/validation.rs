// file: src/utils/validation.rs
// description: input validation and text sanitizing helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Input directory {} does not exist",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Drops every character outside the Basic Multilingual Plane.
    pub fn strip_astral(text: &str) -> String {
        text.chars().filter(|c| (*c as u32) < 0x10000).collect()
    }

    pub fn to_ascii(text: &str) -> String {
        text.chars().filter(char::is_ascii).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("file.md");
        std::fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://example.com").is_ok());
        assert!(Validator::validate_url("http://127.0.0.1:8080").is_ok());
        assert!(Validator::validate_url("example.com").is_err());
    }

    #[test]
    fn test_strip_astral() {
        assert_eq!(Validator::strip_astral("loss 📉 drops"), "loss  drops");
        assert_eq!(Validator::strip_astral("αβγ"), "αβγ");
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(Validator::to_ascii("café ∞"), "caf ");
    }
}
