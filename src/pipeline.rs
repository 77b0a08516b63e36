//! Batch orchestrator.
//!
//! One run: discover today's box score URLs, fetch each page through the
//! shared rate-limited fetcher, then normalize, sequence and persist each
//! record. A failure on one page is logged and skipped; only a failed
//! discovery fetch aborts the run.

use anyhow::{Context, Result};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::ScrapeError;
use crate::record::GameRecord;
use crate::scraper;
use crate::scraper::fetcher::{Fetcher, GamePage, PageSource};
use crate::scraper::parsers::{boxscore, index, series};
use crate::sequence::GameSequence;
use crate::storage::JsonStore;

#[derive(Debug, Default)]
pub struct PullSummary {
    pub discovered: usize,
    pub saved: usize,
    pub skipped: usize,
}

pub async fn run_pull(config: &AppConfig, limit: Option<usize>) -> Result<PullSummary> {
    let run_start = Instant::now();
    info!("Starting pull-boxscores");

    let fetcher = Fetcher::new(config.scraper.request_delay)?;
    let store = JsonStore::new(&config.output.dir);

    let listing_url = scraper::boxes_url(&config.scraper.base_url);
    let listing = fetcher
        .get(&listing_url)
        .await
        .with_context(|| format!("failed to fetch the daily listing {}", listing_url))?;
    let mut urls = index::extract_game_urls(&listing.body, &config.scraper.base_url)
        .context("failed to extract game links from the daily listing")?;
    if let Some(limit) = limit {
        warn!("Limiting run to the first {} games", limit);
        urls.truncate(limit);
    }

    let mut summary = PullSummary {
        discovered: urls.len(),
        ..Default::default()
    };
    info!("Pulling {} box scores", urls.len());

    // Fetch everything first, in listing order; game numbering depends on
    // that order, so parsing happens over the same sequence afterwards.
    let mut pages: Vec<GamePage> = Vec::with_capacity(urls.len());
    for (ix, url) in urls.iter().enumerate() {
        info!("{}/{}", ix + 1, urls.len());
        let item_start = Instant::now();
        match fetcher.get(url).await {
            Ok(page) => {
                pages.push(page);
                info!("Completed in {:.1}s", item_start.elapsed().as_secs_f64());
            }
            Err(e) => {
                error!("Failed to fetch box score {}: {}", url, e);
                summary.skipped += 1;
            }
        }
    }

    info!("Parsing site data");
    parse_and_store(&fetcher, config, &store, &pages, &mut summary).await;

    info!(
        "Finished pull-boxscores in {:.1} s.",
        run_start.elapsed().as_secs_f64()
    );
    Ok(summary)
}

/// Normalize, sequence and persist the fetched pages, in listing order.
///
/// Every per-page step is isolated: a parse or save failure is logged
/// against the page's URL and skipped, and the loop moves on.
async fn parse_and_store(
    source: &impl PageSource,
    config: &AppConfig,
    store: &JsonStore,
    pages: &[GamePage],
    summary: &mut PullSummary,
) {
    let mut sequence = GameSequence::new();
    for (ix, page) in pages.iter().enumerate() {
        info!("{}/{}", ix + 1, pages.len());
        let item_start = Instant::now();
        match process_page(source, config, page, &mut sequence).await {
            Ok(record) => match store.save(&record) {
                Ok(path) => {
                    summary.saved += 1;
                    info!(
                        "Saved {} in {:.1}s",
                        path.display(),
                        item_start.elapsed().as_secs_f64()
                    );
                }
                Err(e) => {
                    error!("Failed to save game record for {}: {}", page.url, e);
                    summary.skipped += 1;
                }
            },
            Err(e) => {
                error!("Failed to parse game box score for {}: {}", page.url, e);
                summary.skipped += 1;
            }
        }
    }
}

/// Normalize one fetched page into a persisted-ready record.
///
/// The sequencer is consulted only after normalization succeeds, so a bad
/// page never consumes a game-number slot.
async fn process_page(
    source: &impl PageSource,
    config: &AppConfig,
    page: &GamePage,
    sequence: &mut GameSequence,
) -> Result<GameRecord, ScrapeError> {
    let parsed = boxscore::parse_box_score(page)?;
    let mut record = parsed.record;

    if let Some(round) = parsed.playoff_round {
        match resolve_playoff_context(source, &config.scraper.base_url, page, &round).await {
            Ok(context) => record.playoff_info = context.playoff_info(),
            Err(e) => warn!(
                "Degrading {} to empty playoff status: {}",
                page.url, e
            ),
        }
    }

    record.game_number = sequence.next_game_number(&record.home_team_name);
    Ok(record)
}

/// Secondary fetch for the playoff series page, through the same source
/// (and therefore the same rate-limit state) as the primary pulls.
async fn resolve_playoff_context(
    source: &impl PageSource,
    base_url: &str,
    page: &GamePage,
    round: &str,
) -> Result<series::SeriesContext, ScrapeError> {
    let url = series::series_page_url(&page.body, base_url)?;
    let series_page = source.get(&url).await?;
    series::parse_series_page(&series_page.body, round)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::scraper::parsers::fixtures::{box_score_page, with_series_link};

    /// Canned in-memory page source keyed by URL.
    struct CannedPages(HashMap<String, String>);

    impl CannedPages {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self(
                pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            )
        }
    }

    impl PageSource for CannedPages {
        async fn get(&self, url: &str) -> Result<GamePage, ScrapeError> {
            match self.0.get(url) {
                Some(body) => Ok(GamePage {
                    url: url.to_string(),
                    body: body.clone(),
                }),
                None => Err(ScrapeError::MalformedPage(format!(
                    "no canned page for {}",
                    url
                ))),
            }
        }
    }

    fn page(url: &str, body: String) -> GamePage {
        GamePage {
            url: url.to_string(),
            body,
        }
    }

    fn test_config() -> AppConfig {
        AppConfig::default()
    }

    #[tokio::test]
    async fn consecutive_home_games_get_increasing_numbers() {
        let config = test_config();
        let fetcher = Fetcher::new(0.0).unwrap();
        let mut sequence = GameSequence::new();

        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "May 3, 2024",
            None,
            false,
        );
        let first = process_page(&fetcher, &config, &page("g1", body.clone()), &mut sequence)
            .await
            .unwrap();
        let second = process_page(&fetcher, &config, &page("g2", body), &mut sequence)
            .await
            .unwrap();

        assert_eq!(first.game_number, 1);
        assert_eq!(second.game_number, 2);
    }

    #[tokio::test]
    async fn different_home_teams_number_independently() {
        let config = test_config();
        let fetcher = Fetcher::new(0.0).unwrap();
        let mut sequence = GameSequence::new();

        let padres_home = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "May 3, 2024",
            None,
            false,
        );
        let mets_home = box_score_page(
            "Atlanta Braves",
            "New York Mets",
            "May 3, 2024",
            None,
            false,
        );

        let first = process_page(&fetcher, &config, &page("g1", padres_home.clone()), &mut sequence)
            .await
            .unwrap();
        let other = process_page(&fetcher, &config, &page("g2", mets_home), &mut sequence)
            .await
            .unwrap();
        let third = process_page(&fetcher, &config, &page("g3", padres_home), &mut sequence)
            .await
            .unwrap();

        assert_eq!(first.game_number, 1);
        assert_eq!(other.game_number, 1);
        assert_eq!(third.game_number, 2);
    }

    #[tokio::test]
    async fn failed_page_does_not_consume_a_sequence_slot() {
        let config = test_config();
        let fetcher = Fetcher::new(0.0).unwrap();
        let mut sequence = GameSequence::new();

        let bad = page("bad", "<html><body>not a box score</body></html>".to_string());
        assert!(process_page(&fetcher, &config, &bad, &mut sequence)
            .await
            .is_err());

        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "May 3, 2024",
            None,
            false,
        );
        let record = process_page(&fetcher, &config, &page("good", body), &mut sequence)
            .await
            .unwrap();
        assert_eq!(record.game_number, 1);
    }

    #[tokio::test]
    async fn playoff_page_without_series_link_degrades_to_empty_status() {
        // Round token present but no game_summaries region: the record is
        // still produced, with empty playoff_info.
        let config = test_config();
        let fetcher = Fetcher::new(0.0).unwrap();
        let mut sequence = GameSequence::new();

        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "October 9, 2024",
            Some("NLDS"),
            false,
        );
        let record = process_page(&fetcher, &config, &page("po", body), &mut sequence)
            .await
            .unwrap();
        assert_eq!(record.playoff_info, "");
        assert_eq!(record.game_number, 1);
    }

    #[tokio::test]
    async fn playoff_series_status_lands_in_playoff_info() {
        // The (2-1) tally on the series page makes this game 3 of the NLDS.
        let config = test_config();

        let body = with_series_link(
            &box_score_page(
                "Los Angeles Dodgers",
                "San Diego Padres",
                "October 9, 2024",
                Some("NLDS"),
                false,
            ),
            "/postseason/2024_NLDS.shtml",
        );
        let source = CannedPages::new(&[(
            "https://www.baseball-reference.com/postseason/2024_NLDS.shtml",
            r#"<html><head>
<title>2024 NLDS - Padres lead 2-1 (2-1) | Baseball-Reference.com</title>
</head><body></body></html>"#,
        )]);

        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let mut summary = PullSummary::default();
        parse_and_store(&source, &config, &store, &[page("po", body)], &mut summary).await;

        assert_eq!(summary.saved, 1);
        assert_eq!(summary.skipped, 0);
        let saved = store
            .load(&dir.path().join("2024-10-09_Padres_at_Dodgers_1.json"))
            .unwrap();
        assert_eq!(saved.playoff_info, "NLDS game 3. Padres lead 2-1 (2-1)");
        assert_eq!(saved.game_number, 1);
    }

    #[tokio::test]
    async fn save_failure_skips_the_page_and_continues() {
        // A directory squatting on the first record's path makes that save
        // fail; the second page of the doubleheader still lands.
        let config = test_config();
        let fetcher = Fetcher::new(0.0).unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("2024-05-03_Padres_at_Dodgers_1.json")).unwrap();
        let store = JsonStore::new(dir.path());

        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "May 3, 2024",
            None,
            false,
        );
        let pages = [page("g1", body.clone()), page("g2", body)];
        let mut summary = PullSummary::default();
        parse_and_store(&fetcher, &config, &store, &pages, &mut summary).await;

        assert_eq!(summary.saved, 1);
        assert_eq!(summary.skipped, 1);
        let second = store
            .load(&dir.path().join("2024-05-03_Padres_at_Dodgers_2.json"))
            .unwrap();
        assert_eq!(second.game_number, 2);
    }
}
