// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "PAPER_CORPUS";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub corpus: CorpusConfig,
    pub papers: PapersConfig,
    pub tokenizer: TokenizerConfig,
    pub model: ModelConfig,
    pub infer: InferConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub skip_patterns: Vec<String>,
    /// 0 disables the size limit.
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PapersConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// `None` means one worker per available CPU.
    pub workers: Option<usize>,
    pub truncate_references: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Local `tokenizer.json` path or a Hugging Face model id.
    pub source: String,
    pub sample_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub repo_id: String,
    pub filename: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferConfig {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    pub host: String,
    pub port: u16,
    pub max_tokens: u32,
    pub temperature: f32,
    pub history_dir: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_patterns: vec![".git/".to_string()],
            max_file_size_mb: 200,
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("q3_dataset"),
            output_file: PathBuf::from("finetuning_data.txt"),
        }
    }
}

impl Default for PapersConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("papers"),
            output_dir: PathBuf::from("processed_data"),
            workers: None,
            truncate_references: true,
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            source: "Qwen/Qwen2.5-3B-Instruct".to_string(),
            sample_chars: 1_000_000,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            repo_id: "Lakshith-403/optima_qwen-3b-instruct-ai-research-finetune".to_string(),
            filename: "q4_model_final.gguf".to_string(),
            api_key: None,
            timeout_secs: 300,
        }
    }
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            prompt: "Hello, how are you?".to_string(),
            max_tokens: 100,
            temperature: 0.3,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
            max_tokens: 1000,
            temperature: 0.3,
            history_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Layers the TOML file (or the optional default file when `path` is
    /// `None`) under `PAPER_CORPUS__*` environment variables. Invalid values
    /// from any layer are an error, never silently replaced by defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layered(path, ENV_PREFIX)
    }

    fn load_layered(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Worker count for the paper pipeline, resolving `None` to the CPU count.
    pub fn worker_count(&self) -> usize {
        self.papers.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.papers.workers == Some(0) {
            return Err(PipelineError::Config(
                "workers must be greater than 0".to_string(),
            ));
        }

        if self.infer.max_tokens == 0 || self.chat.max_tokens == 0 {
            return Err(PipelineError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("infer.temperature", self.infer.temperature),
            ("chat.temperature", self.chat.temperature),
        ] {
            if !(0.1..=1.0).contains(&value) {
                return Err(PipelineError::Config(format!(
                    "{name} must be within 0.1..=1.0, got {value}"
                )));
            }
        }

        if self.tokenizer.sample_chars == 0 {
            return Err(PipelineError::Config(
                "tokenizer.sample_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.corpus.input_dir, PathBuf::from("q3_dataset"));
        assert_eq!(config.papers.output_dir, PathBuf::from("processed_data"));
        assert_eq!(config.infer.max_tokens, 100);
        assert_eq!(config.chat.max_tokens, 1000);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default_config();
        config.papers.workers = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let mut config = Config::default_config();
        config.chat.temperature = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_worker_count_resolves_default() {
        let mut config = Config::default_config();
        assert!(config.worker_count() >= 1);

        config.papers.workers = Some(3);
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_load_partial_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            "[papers]\ninput_dir = \"pdfs\"\nworkers = 2\n\n[chat]\nport = 9000\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.papers.input_dir, PathBuf::from("pdfs"));
        assert_eq!(config.papers.workers, Some(2));
        assert_eq!(config.chat.port, 9000);
        assert_eq!(config.chat.max_tokens, 1000);
    }

    #[test]
    fn test_default_layers_load_without_file() {
        let config = Config::load_layered(None, "PAPER_CORPUS_UNSET").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_env_value_is_an_error() {
        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::set_var("PAPER_CORPUS_BADENV__INFER__TEMPERATURE", "5.0") };

        let result = Config::load_layered(None, "PAPER_CORPUS_BADENV");

        unsafe { std::env::remove_var("PAPER_CORPUS_BADENV__INFER__TEMPERATURE") };
        assert!(result.is_err());
    }
}
