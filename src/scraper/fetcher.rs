//! Rate-limited page fetching.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ScrapeError;

/// A fetched page: raw markup plus the URL it came from.
#[derive(Debug, Clone)]
pub struct GamePage {
    pub url: String,
    pub body: String,
}

/// Anything that produces a page for a URL.
///
/// `Fetcher` is the live implementation; tests substitute canned bodies so
/// secondary fetches can be exercised without a network.
pub trait PageSource {
    fn get(&self, url: &str) -> impl Future<Output = Result<GamePage, ScrapeError>>;
}

impl PageSource for Fetcher {
    async fn get(&self, url: &str) -> Result<GamePage, ScrapeError> {
        Fetcher::get(self, url).await
    }
}

/// HTTP client that enforces a minimum spacing between requests.
///
/// Spacing is measured between request *completions*: the last-request time
/// is recorded only after the response body has arrived, so a slow upstream
/// stretches the effective spacing instead of letting requests bunch up.
/// One instance is shared by all callers, including the secondary playoff
/// series fetches, so they all pace against the same host.
pub struct Fetcher {
    http: reqwest::Client,
    last_completed: Mutex<Option<Instant>>,
    request_delay: Duration,
}

impl Fetcher {
    pub fn new(request_delay_secs: f64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .read_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            last_completed: Mutex::new(None),
            request_delay: Duration::from_secs_f64(request_delay_secs),
        })
    }

    /// Fetch one page, waiting out the remaining spacing interval first.
    ///
    /// No retry on failure; a failed request does not advance the
    /// last-completed marker.
    pub async fn get(&self, url: &str) -> Result<GamePage, ScrapeError> {
        self.pace().await;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScrapeError::network(url, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::network(url, e))?;

        self.mark_completed().await;

        Ok(GamePage {
            url: url.to_string(),
            body,
        })
    }

    /// Sleep until `request_delay` has passed since the last completion.
    async fn pace(&self) {
        let wait = {
            let last = self.last_completed.lock().await;
            match *last {
                Some(at) => self.request_delay.saturating_sub(at.elapsed()),
                None => Duration::ZERO,
            }
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    async fn mark_completed(&self) {
        *self.last_completed.lock().await = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_request_is_not_delayed() {
        let fetcher = Fetcher::new(4.0).unwrap();
        let before = Instant::now();
        fetcher.pace().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn spacing_enforced_between_completions() {
        let fetcher = Fetcher::new(4.0).unwrap();
        fetcher.mark_completed().await;

        let before = Instant::now();
        fetcher.pace().await;
        assert!(before.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_time_counts_toward_spacing() {
        let fetcher = Fetcher::new(4.0).unwrap();
        fetcher.mark_completed().await;
        tokio::time::advance(Duration::from_secs(3)).await;

        let before = Instant::now();
        fetcher.pace().await;
        // Only the remaining second is slept.
        assert_eq!(before.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn no_wait_after_long_idle() {
        let fetcher = Fetcher::new(4.0).unwrap();
        fetcher.mark_completed().await;
        tokio::time::advance(Duration::from_secs(10)).await;

        let before = Instant::now();
        fetcher.pace().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
