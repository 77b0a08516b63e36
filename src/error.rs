//! Error taxonomy for the pull pipeline.
//!
//! Every variant is fatal for the page it occurred on, never for the batch.
//! `PlayoffContext` is softer still: the orchestrator degrades the record to
//! an empty playoff status instead of skipping the page.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The HTTP request failed or returned an error status. Not retried
    /// here; retry policy belongs to the caller.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Team name absent from the franchise table. A data gap (rename or
    /// relocation), not a transient failure.
    #[error("unknown team: {0}")]
    UnknownTeam(String),

    /// The page did not match the expected layout: missing or unmatched
    /// table markers, unexpected title format, missing scorebox elements.
    #[error("malformed page: {0}")]
    MalformedPage(String),

    /// The secondary playoff series page was missing or malformed.
    #[error("playoff context unavailable: {0}")]
    PlayoffContext(String),
}

impl ScrapeError {
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }
}
