mod config;
mod repl;
mod terminal;

use anyhow::Context as _;
use clap::Parser;
use std::sync::Arc;
use symptom_flow::{HttpEngineClient, QuestionCatalog};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; unset means pretty, unknown values fall back to compact.
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("pretty") {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing() {
    let log_format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "symptom_cli=info,symptom_flow=info".into());

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            // Human-readable logging for an interactive terminal
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.engine_config();
    info!("Using diagnosis engine at {}", config.base_url);

    let client = HttpEngineClient::new(config).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Chat => repl::run_chat(Arc::new(client)).await,
        Command::Interview { catalog } => {
            let catalog = match catalog {
                Some(path) => QuestionCatalog::load(&path)
                    .with_context(|| format!("Failed to load catalog {}", path.display()))?,
                None => QuestionCatalog::builtin().context("Bundled catalog is invalid")?,
            };
            repl::run_interview(client, catalog).await
        }
    }
}
