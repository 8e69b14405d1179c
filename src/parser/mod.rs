// file: src/parser/mod.rs
// description: document text extraction and cleaning
// reference: internal module structure

pub mod cleaner;
pub mod markdown;
pub mod patterns;
pub mod pdf;

pub use cleaner::TextCleaner;
pub use markdown::MarkdownReader;
pub use pdf::PdfExtractor;
