//! The canonical per-game output record.

use serde::{Deserialize, Serialize};

/// One normalized box score, written as a single JSON object per game.
///
/// The tabular fields are pipe-delimited text blobs, not nested JSON; the
/// downstream summarizer pastes them into its prompt template verbatim.
/// `game_number` is 1-based and scoped to (home team, scrape batch): game 2
/// of a doubleheader gets 2, regardless of which game finished first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: String,
    pub playoff_info: String,
    pub away_team_city: String,
    pub home_team_city: String,
    pub away_team_name: String,
    pub home_team_name: String,
    pub away_standings: String,
    pub home_standings: String,
    pub game_number: u32,
    pub boxscore: String,
    pub away_batting: String,
    pub home_batting: String,
    pub away_pitching: String,
    pub home_pitching: String,
    pub big_plays: String,
}

impl GameRecord {
    /// Composite key used as the persisted filename stem.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_at_{}_{}",
            self.date, self.home_team_name, self.away_team_name, self.game_number
        )
    }
}
