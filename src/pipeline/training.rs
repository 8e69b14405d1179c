// file: src/pipeline/training.rs
// description: builds the plain text training file from processed jsonl records
// reference: jsonl to corpus conversion with token estimation

use crate::error::{PipelineError, Result};
use crate::exporter::read_records;
use crate::tokenizer::{TokenCounter, estimate_tokens};
use crate::utils::Validator;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct TrainingReport {
    pub samples: usize,
    pub chars: usize,
    pub ascii_fallback: bool,
    pub estimated_tokens: Option<u64>,
}

pub struct TrainingFileBuilder {
    sample_chars: usize,
}

impl TrainingFileBuilder {
    pub fn new(sample_chars: usize) -> Self {
        Self { sample_chars }
    }

    pub fn build(
        &self,
        jsonl_file: &Path,
        output_file: &Path,
        counter: Option<&dyn TokenCounter>,
    ) -> Result<TrainingReport> {
        info!("Creating training file from {}", jsonl_file.display());

        let texts: Vec<String> = read_records(jsonl_file)?
            .into_iter()
            .filter(|record| record.has_text())
            .map(|record| Validator::strip_astral(&record.text))
            .collect();

        info!("Loaded {} text samples", texts.len());

        let combined = texts.join("\n\n");
        let mut report = TrainingReport {
            samples: texts.len(),
            chars: combined.chars().count(),
            ..TrainingReport::default()
        };

        if let Err(e) = fs::write(output_file, &combined) {
            error!("Error saving training file: {}", e);
            fs::write(output_file, Validator::to_ascii(&combined)).map_err(|source| {
                error!("Failed to save training file even with ASCII encoding: {}", source);
                PipelineError::file(output_file, source)
            })?;
            report.ascii_fallback = true;
            info!(
                "Training file saved to {} with ASCII encoding (some characters lost)",
                output_file.display()
            );
        } else {
            info!("Training file saved to {}", output_file.display());
        }

        if let Some(counter) = counter {
            match estimate_tokens(counter, &combined, self.sample_chars) {
                Ok(tokens) => {
                    info!("Training file created with approximately {} tokens", tokens);
                    report.estimated_tokens = Some(tokens);
                }
                Err(e) => warn!("Error calculating token count: {}", e),
            }
        }

        Ok(report)
    }
}

/// Writes every record's text reduced to ASCII, each followed by a blank line.
pub fn write_simplified(jsonl_file: &Path, output_file: &Path) -> Result<usize> {
    let mut out = String::new();
    let mut samples = 0;

    for record in read_records(jsonl_file)? {
        if record.has_text() {
            out.push_str(&Validator::to_ascii(&record.text));
            out.push_str("\n\n");
            samples += 1;
        }
    }

    fs::write(output_file, out).map_err(|source| PipelineError::file(output_file, source))?;
    info!("Simplified training file saved to {}", output_file.display());
    Ok(samples)
}
