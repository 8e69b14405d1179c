// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod inference;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod repository;
pub mod server;
pub mod tokenizer;
pub mod utils;

pub use config::{
    ChatConfig, Config, CorpusConfig, InferConfig, ModelConfig, PapersConfig, ScanConfig,
    TokenizerConfig,
};
pub use error::{PipelineError, Result};
pub use exporter::{JsonlWriter, read_records, write_records};
pub use inference::{
    ChatExchange, ChatReply, ChatSession, CompletionBackend, CompletionParams, LlamaServerClient,
};
pub use models::{PaperRecord, SourceKind};
pub use parser::{MarkdownReader, PdfExtractor, TextCleaner};
pub use pipeline::{
    CorpusBuilder, CorpusReport, PaperPipeline, PapersReport, PipelineStats, TrainingFileBuilder,
};
pub use repository::{FileClassifier, FileScanner, ScannedFile};
pub use tokenizer::{HfTokenizer, TokenCounter};
pub use utils::Validator;
