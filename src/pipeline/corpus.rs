// file: src/pipeline/corpus.rs
// description: concatenates pdf and markdown sources into one plain text corpus
// reference: sequential extract-then-write batch

use crate::config::ScanConfig;
use crate::error::{PipelineError, Result};
use crate::models::SourceKind;
use crate::parser::{MarkdownReader, PdfExtractor};
use crate::repository::FileScanner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct CorpusReport {
    pub pdf_files: usize,
    pub markdown_files: usize,
    pub files_with_text: usize,
    pub bytes_written: usize,
    pub output_file: PathBuf,
}

pub struct CorpusBuilder {
    scanner: FileScanner,
    pdf: PdfExtractor,
    markdown: MarkdownReader,
}

impl CorpusBuilder {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            scanner: FileScanner::new(config),
            pdf: PdfExtractor::new(),
            markdown: MarkdownReader::new(),
        }
    }

    /// Extracts every PDF and Markdown file below `input_dir` and writes the
    /// joined text to `output_file`. Nothing is written when no source file
    /// is found.
    pub fn build(&self, input_dir: &Path, output_file: &Path) -> Result<CorpusReport> {
        let files = self
            .scanner
            .scan_directory(input_dir, &[SourceKind::Pdf, SourceKind::Markdown])
            .inspect_err(|e| error!("{}", e))?;

        if files.is_empty() {
            return Err(PipelineError::NoSourceFiles(input_dir.to_path_buf()));
        }

        if let Some(parent) = output_file.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| PipelineError::file(parent, source))?;
            info!("Created output directory: {}", parent.display());
        }

        let pdf_files = files.iter().filter(|f| f.kind == SourceKind::Pdf).count();
        let markdown_files = files.len() - pdf_files;

        let mut documents = Vec::new();
        for file in &files {
            info!("Processing file: {} ({} bytes)", file.relative_path, file.size);

            let text = match file.kind {
                SourceKind::Pdf => self.pdf.extract_text(&file.path),
                SourceKind::Markdown => self.markdown.extract(&file.path),
            };

            if !text.is_empty() {
                let name = file
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                documents.push((name, text));
            }
        }

        let corpus = assemble_corpus(&documents);
        fs::write(output_file, &corpus).map_err(|source| {
            error!("Error writing to output file {}: {}", output_file.display(), source);
            PipelineError::file(output_file, source)
        })?;

        info!("Successfully wrote extracted text to {}", output_file.display());

        Ok(CorpusReport {
            pdf_files,
            markdown_files,
            files_with_text: documents.len(),
            bytes_written: corpus.len(),
            output_file: output_file.to_path_buf(),
        })
    }
}

/// Prefixes each document with a `--- File: name ---` banner and joins the
/// parts with newlines.
pub fn assemble_corpus(documents: &[(String, String)]) -> String {
    let mut parts = Vec::with_capacity(documents.len() * 2);
    for (name, text) in documents {
        parts.push(format!("\n\n--- File: {} ---\n\n", name));
        parts.push(text.clone());
    }
    parts.join("\n")
}
