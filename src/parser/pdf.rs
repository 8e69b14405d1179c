// file: src/parser/pdf.rs
// description: page-ordered text extraction from pdf documents
// reference: https://docs.rs/pdf-extract

use crate::error::{PipelineError, Result};
use std::fs;
use std::panic;
use std::path::Path;
use tracing::{debug, error, info};

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Text of every page, in page order.
    pub fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).map_err(|source| PipelineError::file(path, source))?;

        // pdf-extract panics on some malformed documents
        let outcome =
            panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(PipelineError::Extraction {
                file: path.display().to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(PipelineError::Extraction {
                file: path.display().to_string(),
                message: "PDF parser panicked".to_string(),
            }),
        }
    }

    /// Concatenated page text, each non-empty page followed by a newline.
    /// Any failure is logged and yields an empty string.
    pub fn extract_text(&self, path: &Path) -> String {
        let pages = match self.extract_pages(path) {
            Ok(pages) => pages,
            Err(e) => {
                error!("Error extracting text from {}: {}", path.display(), e);
                return String::new();
            }
        };

        let mut text = String::new();
        for (page_num, page) in pages.iter().enumerate() {
            if page.trim().is_empty() {
                debug!("Page {} of {} has no text", page_num, path.display());
                continue;
            }
            text.push_str(page);
            text.push('\n');
        }

        info!(
            "Successfully extracted text from PDF file: {} ({} pages)",
            path.display(),
            pages.len()
        );
        text
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a small uncompressed PDF with one Helvetica text line per page.
#[cfg(test)]
pub(crate) fn build_test_pdf(pages: &[&str]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, text) in pages.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}
