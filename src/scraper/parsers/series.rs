//! Playoff series context parser.
//!
//! A playoff box score links to a series summary page whose title reads
//! `"<round blurb> - <status> | ..."`. The status text's trailing tally
//! (`(2-1)` style) gives both teams' series wins; their sum is the ordinal
//! game within the series.

use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::scraper::absolute_url;

/// Resolved postseason context for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesContext {
    pub round: String,
    pub status: String,
    pub game_number: u32,
}

impl SeriesContext {
    /// The persisted playoff_info string.
    pub fn playoff_info(&self) -> String {
        format!("{} game {}. {}", self.round, self.game_number, self.status)
    }
}

/// Locate the series summary link on a box score page: the last anchor in
/// the page's game summaries region.
pub fn series_page_url(markup: &str, base_url: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(markup);
    let selector = Selector::parse("div.game_summaries a").unwrap();
    let href = document
        .select(&selector)
        .last()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| {
            ScrapeError::PlayoffContext("no series link in game summaries".to_string())
        })?;
    Ok(absolute_url(base_url, href))
}

/// Parse the fetched series page into the context for `round`.
pub fn parse_series_page(markup: &str, round: &str) -> Result<SeriesContext, ScrapeError> {
    let document = Html::parse_document(markup);
    let title_selector = Selector::parse("title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>())
        .ok_or_else(|| ScrapeError::PlayoffContext("series page has no title".to_string()))?;

    let status = parse_series_status(&title)?;
    let game_number = series_game_number(&status)?;

    Ok(SeriesContext {
        round: round.to_string(),
        status,
        game_number,
    })
}

/// Status segment of a series page title: `"... - <status> | ..."`.
fn parse_series_status(title: &str) -> Result<String, ScrapeError> {
    let (_, rest) = title.split_once(" - ").ok_or_else(|| {
        ScrapeError::PlayoffContext(format!("unexpected series title: {:?}", title))
    })?;
    Ok(rest.split(" |").next().unwrap_or(rest).trim().to_string())
}

/// Sum of the two single-digit win counts in the status's trailing tally.
fn series_game_number(status: &str) -> Result<u32, ScrapeError> {
    let tally = status.split_whitespace().last().ok_or_else(|| {
        ScrapeError::PlayoffContext("series status is empty".to_string())
    })?;
    let digits: Vec<u32> = tally.chars().filter_map(|c| c.to_digit(10)).collect();
    match digits.as_slice() {
        [a, b] => Ok(a + b),
        _ => Err(ScrapeError::PlayoffContext(format!(
            "unexpected series tally {:?}",
            tally
        ))),
    }
}
