// file: src/inference/session.rs
// description: chat session state behind the send, clear and save actions

use crate::error::{PipelineError, Result};
use crate::inference::backend::{CompletionBackend, CompletionParams};
use crate::inference::prompt::{ChatExchange, format_prompt};
use crate::inference::transcript::{render_transcript, transcript_file_name};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

pub const STATUS_READY: &str = "Ready";
pub const STATUS_EMPTY_MESSAGE: &str = "Please enter a question";
pub const NOTHING_TO_SAVE: &str = "No chat history to save";

pub const MIN_TEMPERATURE: f32 = 0.1;
pub const MAX_TEMPERATURE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub status: String,
    pub response_time: String,
}

impl ChatReply {
    fn new(status: impl Into<String>, response_time: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            response_time: response_time.into(),
        }
    }

    pub fn ready() -> Self {
        Self::new(STATUS_READY, "0.0s")
    }
}

pub struct ChatSession<B> {
    backend: B,
    history: Vec<ChatExchange>,
    max_tokens: u32,
}

impl<B: CompletionBackend> ChatSession<B> {
    pub fn new(backend: B, max_tokens: u32) -> Self {
        Self {
            backend,
            history: Vec::new(),
            max_tokens,
        }
    }

    pub fn history(&self) -> &[ChatExchange] {
        &self.history
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sends `message` with the whole history as context. A blank message is
    /// rejected without calling the backend; a backend failure is recorded
    /// as the assistant's answer.
    pub async fn respond(&mut self, message: &str, temperature: f32) -> ChatReply {
        if message.trim().is_empty() {
            return ChatReply::new(STATUS_EMPTY_MESSAGE, "0.0s");
        }

        let prompt = format_prompt(&self.history, message);
        let params = CompletionParams {
            max_tokens: self.max_tokens,
            temperature: temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE),
        };

        let start = Instant::now();
        let answer = match self.backend.complete(&prompt, params).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Completion failed: {}", e);
                format!("Error querying LLM: {}", e)
            }
        };
        let elapsed = start.elapsed().as_secs_f64();

        self.history.push(ChatExchange::new(message, answer));
        ChatReply::new(STATUS_READY, format!("{:.2}s", elapsed))
    }

    pub fn clear(&mut self) -> ChatReply {
        self.history.clear();
        ChatReply::ready()
    }

    /// Writes the transcript into `dir` under a timestamped name.
    /// Returns `None` when there is nothing to save.
    pub fn save(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if self.history.is_empty() {
            return Ok(None);
        }

        let path = dir.join(transcript_file_name(&Local::now()));
        fs::write(&path, render_transcript(&self.history))
            .map_err(|source| PipelineError::file(&path, source))?;

        info!("Chat history saved to {}", path.display());
        Ok(Some(path))
    }
}
