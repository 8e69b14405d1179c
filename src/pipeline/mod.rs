// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod corpus;
pub mod papers;
mod progress;
pub mod training;

pub use corpus::{CorpusBuilder, CorpusReport, assemble_corpus};
pub use papers::{PaperPipeline, PaperProcessor, PapersReport};
pub use progress::{PipelineStats, ProgressTracker};
pub use training::{TrainingFileBuilder, TrainingReport, write_simplified};
