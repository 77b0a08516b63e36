//! CLI commands for boxpull.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::pipeline;
use crate::scraper::fetcher::GamePage;
use crate::scraper::parsers::parse_box_score;

#[derive(Parser)]
#[command(name = "boxpull")]
#[command(version, about = "Pull daily MLB box scores into per-game JSON records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pull today's box scores and write one JSON record per game
    Pull {
        /// Only process the first N games (smoke-test runs)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output directory override
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds between request completions override
        #[arg(short, long)]
        delay: Option<f64>,
    },

    /// Parse a saved box score page and print the record as JSON
    Parse {
        /// Path to a saved box score HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Run a full pull batch.
pub async fn run_pull(
    limit: Option<usize>,
    output: Option<PathBuf>,
    delay: Option<f64>,
) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = output {
        config.output.dir = dir.to_string_lossy().to_string();
    }
    if let Some(delay) = delay {
        config.scraper.request_delay = delay;
    }

    let summary = pipeline::run_pull(&config, limit).await?;
    info!(
        "Saved {} of {} discovered games",
        summary.saved, summary.discovered
    );
    if summary.skipped > 0 {
        warn!(
            "{} of {} games skipped this run",
            summary.skipped, summary.discovered
        );
    }
    Ok(())
}

/// Normalize one saved page offline and print the resulting record.
///
/// No network is involved: the game number is fixed at 1 (a one-page batch)
/// and playoff context, which would need a secondary fetch, is left empty.
pub async fn run_parse(input: PathBuf) -> anyhow::Result<()> {
    let body = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let page = GamePage {
        url: input.display().to_string(),
        body,
    };

    let parsed = parse_box_score(&page)?;
    let mut record = parsed.record;
    record.game_number = 1;
    if parsed.playoff_round.is_some() {
        warn!("Playoff game; series status needs a live pull, leaving playoff_info empty");
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
