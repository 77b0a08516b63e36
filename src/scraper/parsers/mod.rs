//! Parsers for baseball-reference.com pages.

pub mod boxscore;
pub mod index;
pub mod series;

pub use boxscore::{parse_box_score, ParsedGame};
pub use index::extract_game_urls;
pub use series::SeriesContext;
