// file: src/tokenizer/counter.rs
// description: tokenizer loading and sampled token count estimation
// reference: https://docs.rs/tokenizers

use crate::error::{PipelineError, Result};
use std::path::Path;
use tokenizers::Tokenizer;
use tracing::{debug, info};

pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

pub struct HfTokenizer {
    inner: Tokenizer,
}

impl HfTokenizer {
    /// Loads a local tokenizer when `source` is an existing file or ends in
    /// `.json`, otherwise fetches the tokenizer of the named Hugging Face model.
    pub fn load(source: &str) -> Result<Self> {
        let path = Path::new(source);
        let inner = if path.is_file() || source.ends_with(".json") {
            debug!("Loading tokenizer from file {}", path.display());
            Tokenizer::from_file(path)
        } else {
            debug!("Loading tokenizer {} from the Hugging Face hub", source);
            Tokenizer::from_pretrained(source, None)
        }
        .map_err(|e| PipelineError::Tokenizer(format!("cannot load '{}': {}", source, e)))?;

        info!("Loaded tokenizer {}", source);
        Ok(Self { inner })
    }
}

impl TokenCounter for HfTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| PipelineError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().len())
    }
}

/// Counts whitespace separated words.
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// Encodes at most `sample_chars` characters and scales the count linearly
/// to the full length of `text`.
pub fn estimate_tokens<C: TokenCounter + ?Sized>(
    counter: &C,
    text: &str,
    sample_chars: usize,
) -> Result<u64> {
    let (sample, sample_len) = match text.char_indices().nth(sample_chars) {
        Some((idx, _)) => (&text[..idx], sample_chars),
        None => (text, text.chars().count()),
    };

    let tokens = counter.count_tokens(sample)?;
    let total_chars = text.chars().count();

    if total_chars > sample_len && sample_len > 0 {
        let scale = total_chars as f64 / sample_len as f64;
        Ok((tokens as f64 * scale) as u64)
    } else {
        Ok(tokens as u64)
    }
}
