//! Canonical MLB franchise identities.
//!
//! Box score pages print full franchise names; the record stores city and
//! nickname separately. The table is fixed: a name that is not in it means
//! the table is stale (rename or relocation) and the page is skipped.

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub city: String,
    pub name: String,
}

/// Split a full franchise name into its canonical (city, name) pair.
pub fn resolve(full_name: &str) -> Result<TeamIdentity, ScrapeError> {
    let (city, name) = match full_name {
        "Baltimore Orioles" => ("Baltimore", "Orioles"),
        "Boston Red Sox" => ("Boston", "Red Sox"),
        "New York Yankees" => ("New York", "Yankees"),
        "Tampa Bay Rays" => ("Tampa Bay", "Rays"),
        "Toronto Blue Jays" => ("Toronto", "Blue Jays"),
        "Chicago White Sox" => ("Chicago", "White Sox"),
        "Cleveland Guardians" => ("Cleveland", "Guardians"),
        "Detroit Tigers" => ("Detroit", "Tigers"),
        "Kansas City Royals" => ("Kansas City", "Royals"),
        "Minnesota Twins" => ("Minnesota", "Twins"),
        "Houston Astros" => ("Houston", "Astros"),
        "Los Angeles Angels" => ("Los Angeles", "Angels"),
        "Oakland Athletics" => ("Oakland", "Athletics"),
        // The franchise dropped its city during the Sacramento interim.
        "Athletics" => ("The", "Athletics"),
        "Seattle Mariners" => ("Seattle", "Mariners"),
        "Texas Rangers" => ("Texas", "Rangers"),
        "Atlanta Braves" => ("Atlanta", "Braves"),
        "Miami Marlins" => ("Miami", "Marlins"),
        "New York Mets" => ("New York", "Mets"),
        "Philadelphia Phillies" => ("Philadelphia", "Phillies"),
        "Washington Nationals" => ("Washington", "Nationals"),
        "Chicago Cubs" => ("Chicago", "Cubs"),
        "Cincinnati Reds" => ("Cincinnati", "Reds"),
        "Milwaukee Brewers" => ("Milwaukee", "Brewers"),
        "Pittsburgh Pirates" => ("Pittsburgh", "Pirates"),
        "St. Louis Cardinals" => ("St. Louis", "Cardinals"),
        "Arizona Diamondbacks" => ("Arizona", "Diamondbacks"),
        "Colorado Rockies" => ("Colorado", "Rockies"),
        "Los Angeles Dodgers" => ("Los Angeles", "Dodgers"),
        "San Diego Padres" => ("San Diego", "Padres"),
        "San Francisco Giants" => ("San Francisco", "Giants"),
        _ => return Err(ScrapeError::UnknownTeam(full_name.to_string())),
    };

    Ok(TeamIdentity {
        city: city.to_string(),
        name: name.to_string(),
    })
}
