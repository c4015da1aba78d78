use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{HnSearchClient, SearchSession};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;

use config::{load_settings, Overrides};

#[derive(Parser, Debug)]
#[command(name = "hacker-stories", about = "Search Hacker News stories from the terminal")]
struct Args {
    /// Path to a TOML config file (default: ./hacker_stories.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    /// latest_request or last_resolved
    #[arg(long)]
    stale_responses: Option<String>,
    /// Fetch the saved search once, print it and exit.
    #[arg(long)]
    once: bool,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(
        args.config.as_deref(),
        &Overrides {
            endpoint: args.endpoint,
            database_url: args.database_url,
            stale_responses: args.stale_responses,
        },
    )?;
    info!(
        endpoint = %settings.endpoint,
        database_url = %settings.database_url,
        "starting hacker stories"
    );

    let storage = Storage::new(&settings.database_url).await?;
    let source = HnSearchClient::new(settings.request_timeout())?;
    let (session, completions) = SearchSession::open(
        settings.session_config()?,
        Arc::new(source),
        Arc::new(storage),
    )
    .await?;

    if args.once {
        app::run_once(session, completions).await
    } else {
        app::run_interactive(session, completions).await
    }
}
