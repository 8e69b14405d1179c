// file: src/pipeline/papers.rs
// description: parallel pdf to jsonl pipeline followed by training file creation
// reference: bounded buffer_unordered fan-out over blocking extraction tasks

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::exporter::write_records;
use crate::models::{PaperRecord, SourceKind};
use crate::parser::{PdfExtractor, TextCleaner};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::pipeline::training::{TrainingFileBuilder, TrainingReport, write_simplified};
use crate::repository::{FileClassifier, FileScanner};
use crate::tokenizer::{HfTokenizer, TokenCounter};
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const JSONL_FILE: &str = "processed_pdfs.jsonl";
pub const TRAINING_FILE: &str = "training_data.txt";
pub const SIMPLIFIED_FILE: &str = "training_data_simplified.txt";

/// Turns a single PDF into a cleaned record. Shared by all workers.
pub struct PaperProcessor {
    extractor: PdfExtractor,
    cleaner: TextCleaner,
    classifier: FileClassifier,
}

impl PaperProcessor {
    pub fn new(cleaner: TextCleaner) -> Self {
        Self {
            extractor: PdfExtractor::new(),
            cleaner,
            classifier: FileClassifier::new(),
        }
    }

    pub fn process_pdf(&self, path: &Path) -> PaperRecord {
        info!("Processing {}", path.display());

        let raw_text = self.extractor.extract_text(path);
        let text = self.cleaner.clean(&raw_text);
        let category = self.classifier.category_for(path);

        PaperRecord::new(path, text, category)
    }
}

#[derive(Debug, Clone)]
pub struct PapersReport {
    pub records: usize,
    pub stats: PipelineStats,
    pub jsonl_file: PathBuf,
    pub training_file: Option<PathBuf>,
    pub simplified_file: Option<PathBuf>,
    pub training: Option<TrainingReport>,
}

pub struct PaperPipeline {
    config: Config,
    processor: Arc<PaperProcessor>,
    workers: usize,
}

impl PaperPipeline {
    pub fn new(config: Config) -> Self {
        let workers = config.worker_count().max(1);
        let processor = Arc::new(PaperProcessor::new(TextCleaner::new(
            config.papers.truncate_references,
        )));

        Self {
            config,
            processor,
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Processes every PDF below `input_dir` on up to `workers` blocking
    /// tasks and writes the records with non-empty text to `jsonl_file`,
    /// in completion order.
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        jsonl_file: &Path,
    ) -> Result<(Vec<PaperRecord>, PipelineStats)> {
        let scanner = FileScanner::new(self.config.scan.clone());
        let files = scanner.scan_directory(input_dir, &[SourceKind::Pdf])?;
        info!(
            "Found {} PDF files to process with {} workers",
            files.len(),
            self.workers
        );

        let tracker = ProgressTracker::new(files.len());

        let mut results = stream::iter(files.into_iter().map(|file| {
            let processor = Arc::clone(&self.processor);
            debug!("Queued {} ({} bytes)", file.relative_path, file.size);
            async move {
                let path = file.path;
                let task_path = path.clone();
                let outcome =
                    tokio::task::spawn_blocking(move || processor.process_pdf(&task_path)).await;
                (path, outcome)
            }
        }))
        .buffer_unordered(self.workers);

        let mut records = Vec::new();
        while let Some((path, outcome)) = results.next().await {
            match outcome {
                Ok(record) if record.has_text() => {
                    tracker.record_kept(record.text.chars().count());
                    records.push(record);
                }
                Ok(_) => {
                    debug!("No text left after cleaning: {}", path.display());
                    tracker.inc_files_empty();
                }
                Err(e) => {
                    error!("Error processing {}: {}", path.display(), e);
                    tracker.inc_files_failed();
                }
            }
        }

        tracker.finish();
        let stats = tracker.get_stats();
        info!("Successfully processed {} PDF files", records.len());

        write_records(jsonl_file, &records)?;
        Ok((records, stats))
    }

    /// Full run: JSONL into `output_dir`, then the training file, falling
    /// back to an ASCII-only simplified file when that fails.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<PapersReport> {
        fs::create_dir_all(output_dir).map_err(|source| PipelineError::file(output_dir, source))?;

        let jsonl_file = output_dir.join(JSONL_FILE);
        let (records, stats) = self.process_directory(input_dir, &jsonl_file).await?;

        let training_file = output_dir.join(TRAINING_FILE);
        let tokenizer_source = self.config.tokenizer.source.clone();
        let builder = TrainingFileBuilder::new(self.config.tokenizer.sample_chars);
        let jsonl = jsonl_file.clone();
        let training_path = training_file.clone();

        let training = tokio::task::spawn_blocking(move || {
            let tokenizer = match HfTokenizer::load(&tokenizer_source) {
                Ok(tokenizer) => Some(tokenizer),
                Err(e) => {
                    warn!("Error loading tokenizer: {}. Proceeding without tokenization.", e);
                    None
                }
            };
            builder.build(
                &jsonl,
                &training_path,
                tokenizer.as_ref().map(|t| t as &dyn TokenCounter),
            )
        })
        .await
        .map_err(|e| PipelineError::Extraction {
            file: training_file.display().to_string(),
            message: e.to_string(),
        })
        .and_then(|result| result);

        let mut report = PapersReport {
            records: records.len(),
            stats,
            jsonl_file: jsonl_file.clone(),
            training_file: None,
            simplified_file: None,
            training: None,
        };

        match training {
            Ok(training) => {
                report.training_file = Some(training_file);
                report.training = Some(training);
            }
            Err(e) => {
                warn!(
                    "Failed to create training file with all data ({}). Creating a simplified version...",
                    e
                );
                let simplified = output_dir.join(SIMPLIFIED_FILE);
                write_simplified(&jsonl_file, &simplified)?;
                report.simplified_file = Some(simplified);
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::read_records;
    use crate::parser::pdf::build_test_pdf;
    use tempfile::TempDir;

    fn test_config(workers: usize) -> Config {
        let mut config = Config::default_config();
        config.papers.workers = Some(workers);
        config.tokenizer.source = "/nonexistent/tokenizer.json".to_string();
        config
    }

    #[test]
    fn test_process_pdf_builds_cleaned_record() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("vision")).unwrap();
        let path = temp.path().join("vision/vit.pdf");
        fs::write(&path, build_test_pdf(&["Patches", "References"])).unwrap();

        let record = PaperProcessor::new(TextCleaner::default()).process_pdf(&path);

        assert_eq!(record.filename, "vit.pdf");
        assert_eq!(record.category, "vision");
        assert!(record.text.contains("Patches"));
        assert!(!record.text.contains("References"));
    }

    #[test]
    fn test_process_unreadable_pdf_has_empty_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        fs::write(&path, b"garbage").unwrap();

        let record = PaperProcessor::new(TextCleaner::default()).process_pdf(&path);
        assert!(!record.has_text());
    }

    #[tokio::test]
    async fn test_process_directory_keeps_only_records_with_text() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::create_dir_all(input.path().join("nlp")).unwrap();
        fs::write(input.path().join("nlp/bert.pdf"), build_test_pdf(&["Pretraining"])).unwrap();
        fs::write(input.path().join("nlp/gpt.pdf"), build_test_pdf(&["Generative"])).unwrap();
        fs::write(input.path().join("broken.pdf"), b"garbage").unwrap();
        fs::write(input.path().join("notes.md"), "not a pdf").unwrap();

        let jsonl = output.path().join(JSONL_FILE);
        let pipeline = PaperPipeline::new(test_config(2));
        let (records, stats) = pipeline.process_directory(input.path(), &jsonl).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(stats.records_kept, 2);
        assert_eq!(stats.files_empty, 1);

        let mut names: Vec<_> = read_records(&jsonl)
            .unwrap()
            .into_iter()
            .map(|r| (r.filename, r.category))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                ("bert.pdf".to_string(), "nlp".to_string()),
                ("gpt.pdf".to_string(), "nlp".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_writes_jsonl_and_training_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("lora.pdf"), build_test_pdf(&["Adapters"])).unwrap();

        let out_dir = output.path().join("processed_data");
        let report = PaperPipeline::new(test_config(1))
            .run(input.path(), &out_dir)
            .await
            .unwrap();

        assert_eq!(report.records, 1);
        assert!(out_dir.join(JSONL_FILE).exists());
        assert_eq!(report.training_file, Some(out_dir.join(TRAINING_FILE)));
        assert!(report.simplified_file.is_none());

        let training = report.training.unwrap();
        assert_eq!(training.samples, 1);
        assert_eq!(training.estimated_tokens, None);
        assert!(fs::read_to_string(out_dir.join(TRAINING_FILE)).unwrap().contains("Adapters"));
    }

    #[tokio::test]
    async fn test_run_falls_back_to_simplified_training_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("moe.pdf"), build_test_pdf(&["Experts"])).unwrap();

        // a directory in place of the training file makes both writes fail
        let out_dir = output.path().join("processed_data");
        fs::create_dir_all(out_dir.join(TRAINING_FILE)).unwrap();

        let report = PaperPipeline::new(test_config(1))
            .run(input.path(), &out_dir)
            .await
            .unwrap();

        assert_eq!(report.records, 1);
        assert!(report.training_file.is_none());
        assert!(report.training.is_none());
        assert_eq!(report.simplified_file, Some(out_dir.join(SIMPLIFIED_FILE)));

        let records = read_records(&out_dir.join(JSONL_FILE)).unwrap();
        let simplified = fs::read_to_string(out_dir.join(SIMPLIFIED_FILE)).unwrap();
        assert!(simplified.is_ascii());
        assert!(simplified.contains("Experts"));
        assert_eq!(simplified, format!("{}\n\n", records[0].text));
    }

    #[tokio::test]
    async fn test_run_without_pdfs_writes_empty_outputs() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("readme.md"), "no papers here").unwrap();

        let out_dir = output.path().join("processed_data");
        let report = PaperPipeline::new(test_config(2))
            .run(input.path(), &out_dir)
            .await
            .unwrap();

        assert_eq!(report.records, 0);
        assert_eq!(report.stats.files_seen(), 0);
        assert_eq!(fs::read_to_string(out_dir.join(JSONL_FILE)).unwrap(), "");
        assert_eq!(fs::read_to_string(out_dir.join(TRAINING_FILE)).unwrap(), "");
        assert_eq!(report.training.unwrap().samples, 0);
    }

    #[tokio::test]
    async fn test_run_missing_input_fails() {
        let output = TempDir::new().unwrap();
        let result = PaperPipeline::new(test_config(1))
            .run(Path::new("/nonexistent/papers"), output.path())
            .await;
        assert!(result.is_err());
    }
}
