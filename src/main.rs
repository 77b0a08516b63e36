//! boxpull: daily MLB box score puller.
//!
//! Scrapes baseball-reference.com box score pages into normalized per-game
//! JSON records for the downstream summary generator.

mod cli;
mod config;
mod error;
mod pipeline;
mod record;
mod scraper;
mod sequence;
mod storage;
mod teams;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxpull=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Pull {
            limit,
            output,
            delay,
        } => cli::run_pull(limit, output, delay).await,
        Commands::Parse { input } => cli::run_parse(input).await,
    }
}
