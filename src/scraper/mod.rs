//! Scraper for baseball-reference.com box score pages.
//!
//! Provides rate-limited fetching, table-block extraction and page parsers.

pub mod fetcher;
pub mod parsers;
pub mod tables;

pub use fetcher::{Fetcher, GamePage};

/// Default base URL for baseball-reference.com
pub const BASE_URL: &str = "https://www.baseball-reference.com";

/// Build the daily box score listing URL
pub fn boxes_url(base_url: &str) -> String {
    format!("{}/boxes", base_url)
}

/// Resolve a possibly site-relative href against the base URL
pub fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_url() {
        assert_eq!(
            boxes_url(BASE_URL),
            "https://www.baseball-reference.com/boxes"
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url(BASE_URL, "/boxes/SDN/SDN202405030.shtml"),
            "https://www.baseball-reference.com/boxes/SDN/SDN202405030.shtml"
        );
        assert_eq!(
            absolute_url(BASE_URL, "https://example.com/x"),
            "https://example.com/x"
        );
    }
}
