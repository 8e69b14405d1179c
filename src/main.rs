// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use paper_corpus::utils::logging::{format_error, format_info, format_success};
use paper_corpus::{
    CompletionBackend, CompletionParams, Config, CorpusBuilder, LlamaServerClient, PaperPipeline,
    server,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "paper_corpus")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Fine-tuning corpus preparation and chat for AI research papers", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = paper_corpus::config::DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from PDF and Markdown files into one training corpus
    Corpus {
        /// Directory containing PDF and Markdown files
        #[arg(long = "input_dir", alias = "input-dir", value_name = "DIR")]
        input_dir: Option<PathBuf>,

        /// Output file for extracted text
        #[arg(long = "output_file", alias = "output-file", value_name = "FILE")]
        output_file: Option<PathBuf>,
    },

    /// Extract and clean PDFs in parallel into JSONL and a training file
    Papers {
        /// Directory containing PDF files
        #[arg(long = "input_dir", alias = "input-dir", value_name = "DIR")]
        input_dir: Option<PathBuf>,

        /// Directory to save processed data
        #[arg(long = "output_dir", alias = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Number of workers (defaults to the CPU count)
        #[arg(long, value_name = "NUM")]
        workers: Option<usize>,
    },

    /// Send a single prompt to the model and print the completion
    Infer {
        prompt: Option<String>,

        #[arg(long = "max_tokens", alias = "max-tokens", value_name = "NUM")]
        max_tokens: Option<u32>,

        #[arg(long)]
        temperature: Option<f32>,
    },

    /// Serve the browser chat UI
    Chat {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    paper_corpus::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load default configuration")?
    };

    match cli.command {
        Commands::Corpus {
            input_dir,
            output_file,
        } => {
            let mut config = config;
            if let Some(dir) = input_dir {
                config.corpus.input_dir = dir;
            }
            if let Some(file) = output_file {
                config.corpus.output_file = file;
            }
            cmd_corpus(config).await?;
        }
        Commands::Papers {
            input_dir,
            output_dir,
            workers,
        } => {
            let mut config = config;
            if let Some(dir) = input_dir {
                config.papers.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.papers.output_dir = dir;
            }
            if workers.is_some() {
                config.papers.workers = workers;
            }
            config.validate().context("Invalid papers options")?;
            cmd_papers(config).await?;
        }
        Commands::Infer {
            prompt,
            max_tokens,
            temperature,
        } => {
            let mut config = config;
            if let Some(prompt) = prompt {
                config.infer.prompt = prompt;
            }
            if let Some(max_tokens) = max_tokens {
                config.infer.max_tokens = max_tokens;
            }
            if let Some(temperature) = temperature {
                config.infer.temperature = temperature;
            }
            config.validate().context("Invalid infer options")?;
            cmd_infer(&config).await?;
        }
        Commands::Chat { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.chat.host = host;
            }
            if let Some(port) = port {
                config.chat.port = port;
            }
            cmd_chat(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_corpus(config: Config) -> Result<()> {
    info!(
        "Starting extraction from {} to {}",
        config.corpus.input_dir.display(),
        config.corpus.output_file.display()
    );

    let result = tokio::task::spawn_blocking(move || {
        CorpusBuilder::new(config.scan.clone())
            .build(&config.corpus.input_dir, &config.corpus.output_file)
    })
    .await
    .context("Corpus extraction task failed")?;

    match result {
        Ok(report) => {
            info!(
                "Extracted {} of {} files ({} bytes)",
                report.files_with_text,
                report.pdf_files + report.markdown_files,
                report.bytes_written
            );
            println!("{}", format_success("Extraction completed successfully"));
            Ok(())
        }
        Err(e) => {
            error!("Extraction failed: {}", e);
            println!("{}", format_error("Extraction failed"));
            Err(e.into())
        }
    }
}

async fn cmd_papers(config: Config) -> Result<()> {
    let start_time = Instant::now();
    let input_dir = config.papers.input_dir.clone();
    let output_dir = config.papers.output_dir.clone();

    let pipeline = PaperPipeline::new(config);
    info!("Processing PDFs with {} workers", pipeline.workers());

    let report = pipeline
        .run(&input_dir, &output_dir)
        .await
        .context("PDF pipeline failed")?;

    info!(
        "Processed {} of {} PDF files in {:.2}s ({:.1}% kept)",
        report.records,
        report.stats.files_seen(),
        start_time.elapsed().as_secs_f64(),
        report.stats.success_rate()
    );
    info!(
        "Extraction: {} chars kept, {} empty, {} failed, {:.2} files/sec over {}s",
        report.stats.total_chars,
        report.stats.files_empty,
        report.stats.files_failed,
        report.stats.files_per_second(),
        report.stats.duration_secs
    );

    if let Some(tokens) = report.training.as_ref().and_then(|t| t.estimated_tokens) {
        println!("{}", format_info(&format!("Estimated training tokens: {}", tokens)));
    }

    match (&report.training_file, &report.simplified_file) {
        (Some(path), _) => println!(
            "{}",
            format_success(&format!("Training file written to {}", path.display()))
        ),
        (None, Some(path)) => println!(
            "{}",
            format_info(&format!("Simplified training file written to {}", path.display()))
        ),
        (None, None) => {}
    }

    Ok(())
}

async fn cmd_infer(config: &Config) -> Result<()> {
    let client = LlamaServerClient::new(&config.model).context("Failed to create model client")?;
    info!("Querying {} at {}", client.model(), client.url());

    let params = CompletionParams {
        max_tokens: config.infer.max_tokens,
        temperature: config.infer.temperature,
    };

    let response = client
        .complete(&config.infer.prompt, params)
        .await
        .context("Completion request failed")?;

    println!("{}", response);
    Ok(())
}

async fn cmd_chat(config: &Config) -> Result<()> {
    info!("Initializing AI Research Assistant...");

    let client = LlamaServerClient::new(&config.model).context("Failed to create model client")?;
    server::serve(client, &config.chat)
        .await
        .context("Chat server failed")?;

    Ok(())
}
