// file: src/exporter/mod.rs
// description: exporter module exports
// reference: internal module structure

pub mod jsonl;

pub use jsonl::{JsonlWriter, read_records, write_records};
