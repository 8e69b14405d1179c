// file: src/models/mod.rs
// description: data models module exports
// reference: internal data structures

pub mod record;

pub use record::{PaperRecord, SourceKind};
