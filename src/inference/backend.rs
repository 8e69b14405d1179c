// file: src/inference/backend.rs
// description: completion requests against an openai compatible llama.cpp server
// reference: https://github.com/ggml-org/llama.cpp/tree/master/tools/server

use crate::config::ModelConfig;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Client for a server hosting the fine-tuned GGUF artifact, addressed as
/// `<repo_id>/<filename>`.
pub struct LlamaServerClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl LlamaServerClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Validator::validate_url(&config.endpoint)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Model(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/v1/completions", config.endpoint.trim_end_matches('/')),
            model: format!("{}/{}", config.repo_id, config.filename),
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionBackend for LlamaServerClient {
    async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        debug!(
            "Requesting completion from {} for {} chars",
            self.url,
            prompt.len()
        );

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PipelineError::Model(format!("Failed to send completion request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Model(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            PipelineError::Model(format!("Failed to parse completion response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| PipelineError::Model("No completion choices returned".to_string()))
    }
}
