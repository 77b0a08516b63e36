//! Daily listing page parser.
//!
//! The listing page carries one `game_summary` block per finished game; the
//! block's second anchor points at the box score page.

use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::scraper::absolute_url;

/// Extract every box score URL from the daily listing page, in page order.
pub fn extract_game_urls(markup: &str, base_url: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(markup);
    let summary_selector = Selector::parse("div.game_summary").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut urls = Vec::new();
    for summary in document.select(&summary_selector) {
        let href = summary
            .select(&anchor_selector)
            .nth(1)
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| {
                ScrapeError::MalformedPage(
                    "game summary block without a box score link".to_string(),
                )
            })?;
        urls.push(absolute_url(base_url, href));
    }

    Ok(urls)
}
