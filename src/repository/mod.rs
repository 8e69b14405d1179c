// file: src/repository/mod.rs
// description: source directory discovery and classification
// reference: internal module structure

pub mod classifier;
pub mod scanner;

pub use classifier::FileClassifier;
pub use scanner::{FileScanner, ScannedFile};
