//! Batch-scoped game numbering for doubleheaders and tripleheaders.

/// Tracks how many times each home team has appeared in the current batch.
///
/// The number is assigned in processing order, so the caller must consume
/// pages in the order they were discovered and ask for a number exactly once
/// per successfully normalized record. State lives for one run only.
#[derive(Debug, Default)]
pub struct GameSequence {
    seen_home_teams: Vec<String>,
}

impl GameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordinal game number for this home team within the batch, starting at 1.
    pub fn next_game_number(&mut self, home_team_name: &str) -> u32 {
        let prior = self
            .seen_home_teams
            .iter()
            .filter(|seen| seen.as_str() == home_team_name)
            .count() as u32;
        self.seen_home_teams.push(home_team_name.to_string());
        prior + 1
    }
}
