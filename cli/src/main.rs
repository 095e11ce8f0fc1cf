//! `lra`: command-line shell for the legal research assistant.
//!
//! ```bash
//! lra ingest --reset            # segment ./data/*.txt, build the dense and lexical indexes
//! lra summarize                 # generate and index one summary per document
//! lra ask "KVKK madde 5 ne diyor?"
//! lra ask "Merhaba" --json
//! lra health
//! ```

mod output;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lra_ai::embeddings::ollama_embed::OllamaEmbedder;
use lra_ai::ingest::{ingest_corpus, summarize_corpus};
use lra_ai::llm::ollama_llm::OllamaLlm;
use lra_ai::ollama::OllamaClient;
use lra_ai::Assistant;
use lra_core::config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lra", version, about = "Legal research assistant")]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment the corpus and build the passage indexes
    Ingest {
        /// Drop the existing dense store before syncing
        #[arg(long)]
        reset: bool,
    },
    /// Generate per-document summaries for overview questions
    Summarize {
        #[arg(long)]
        reset: bool,
    },
    /// Answer one question
    Ask {
        question: String,
        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the local Ollama server responds
    Health,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    info!(data_dir = %cfg.paths.data_dir.display(), index_dir = %cfg.paths.index_dir.display(), "configuration loaded");

    match cli.command {
        Command::Ingest { reset } => {
            let client = OllamaClient::from_config(&cfg.ollama)?;
            let report = ingest_corpus(&cfg, Arc::new(OllamaEmbedder::new(client)), reset)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Summarize { reset } => {
            let client = OllamaClient::from_config(&cfg.ollama)?;
            let llm = OllamaLlm::new(client.clone());
            let status = summarize_corpus(&cfg, &llm, Arc::new(OllamaEmbedder::new(client)), reset)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Ask { question, json } => {
            let started = Instant::now();
            let resp = match Assistant::from_config(&cfg).and_then(|a| a.handle(&question)) {
                Ok(resp) => resp,
                Err(e) if json => {
                    println!("{}", output::error_json(&e)?);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            };
            let reply = output::Reply::new(resp, started.elapsed());
            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", output::format_human(&reply));
            }
        }
        Command::Health => {
            OllamaClient::from_config(&cfg.ollama)?.health_check()?;
            println!("ollama: ok ({})", cfg.ollama.base_url);
        }
    }
    Ok(())
}
