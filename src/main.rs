//! Gatewarden batch triage entrypoint.
//!
//! Reads a JSON array of pull request records, runs one pipeline pass, and
//! writes the triage report as JSON. Diagnostics go to stderr via `tracing`;
//! stdout carries only the report when no `--output` is given.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use gatewarden::config::TriageConfig;
use gatewarden::embedding::{CachedEmbedder, EmbeddingProvider, HashedEmbedder, HttpEmbedder};
use gatewarden::model::PullRequest;
use gatewarden::pipeline::TriagePipeline;
use gatewarden::vision::VisionDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Provider {
    /// Offline feature-hashing embedder. Deterministic, no network.
    Hashed,
    /// OpenAI-compatible `/embeddings` endpoint.
    Http,
}

#[derive(Parser)]
#[command(
    name = "gatewarden",
    about = "Two-tier pull request triage: duplicate clustering and suspicion scoring"
)]
struct Cli {
    /// JSON array of pull request records; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Report destination; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// YAML vision document whose focus areas extend the sensitive paths
    #[arg(long)]
    vision: Option<PathBuf>,

    /// Embedding provider backing the duplicate-clustering tier
    #[arg(long, value_enum, default_value_t = Provider::Hashed)]
    provider: Provider,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = TriageConfig::from_env()?;
    if let Some(path) = &cli.vision {
        let vision = VisionDocument::load(path)?;
        vision.extend_sensitive_paths(&mut config);
        tracing::info!(path = %path.display(), "Applied vision focus areas");
    }

    let provider = build_provider(cli.provider, &config)?;
    let pipeline = TriagePipeline::new(config, provider)?;

    let prs = read_batch(cli.input.as_deref())?;
    tracing::info!(batch = prs.len(), "Batch loaded");

    let report = pipeline.run(&prs).await;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    write_report(cli.output.as_deref(), &rendered)?;

    Ok(())
}

fn build_provider(
    provider: Provider,
    config: &TriageConfig,
) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    match provider {
        Provider::Hashed => {
            let embedder = HashedEmbedder::new(config.embedding_dimension);
            Ok(Arc::new(CachedEmbedder::from_config(embedder, config)))
        }
        Provider::Http => {
            let embedder = HttpEmbedder::from_config(config)
                .context("HTTP embedding provider rejected the configuration")?;
            Ok(Arc::new(CachedEmbedder::from_config(embedder, config)))
        }
    }
}

fn read_batch(input: Option<&Path>) -> anyhow::Result<Vec<PullRequest>> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("input is not a JSON array of pull request records")
}

fn write_report(output: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write report to '{}'", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
