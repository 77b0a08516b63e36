//! Box score page parser.
//!
//! Turns one fetched page into a `GameRecord`: five marked stat tables, the
//! visible line score, and the metadata scattered around the page (title
//! date, playoff round token, scorebox team blocks).

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use crate::record::GameRecord;
use crate::scraper::fetcher::GamePage;
use crate::scraper::tables::{self, Grid};
use crate::teams;

/// Known postseason round labels, as they appear in page titles.
const ROUND_PATTERN: &str = r"(World Series|ALWC|NLWC|ALCS|NLCS|ALDS|NLDS)";

/// Derived pitching columns not kept in the canonical record.
const PITCHING_DROP_COLUMNS: [&str; 3] = ["GSc", "IR", "IS"];

/// A normalized record plus the playoff round token, if the title carried
/// one. The round drives the secondary series fetch; `game_number` is left
/// at 0 for the sequencer.
#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub record: GameRecord,
    pub playoff_round: Option<String>,
}

/// Page metadata pulled from the title and the scorebox region.
#[derive(Debug, Clone)]
struct PageMeta {
    date: String,
    playoff_round: Option<String>,
    away_team: String,
    away_standings: String,
    home_team: String,
    home_standings: String,
}

pub fn parse_box_score(page: &GamePage) -> Result<ParsedGame, ScrapeError> {
    let blocks = tables::extract_table_blocks(&page.body)?;
    if blocks.len() < 5 {
        return Err(ScrapeError::MalformedPage(format!(
            "expected 5 stat tables, found {}",
            blocks.len()
        )));
    }

    let mut away_batting = tables::parse_grid(&blocks[0])?;
    away_batting.drop_last_column();
    away_batting.drop_empty_rows();

    let mut home_batting = tables::parse_grid(&blocks[1])?;
    home_batting.drop_last_column();
    home_batting.drop_empty_rows();

    let mut away_pitching = tables::parse_grid(&blocks[2])?;
    away_pitching.drop_columns(&PITCHING_DROP_COLUMNS);

    let mut home_pitching = tables::parse_grid(&blocks[3])?;
    home_pitching.drop_columns(&PITCHING_DROP_COLUMNS);

    let big_plays = tables::parse_grid(&blocks[4])?;

    let document = Html::parse_document(&page.body);
    let meta = parse_meta(&document)?;
    let boxscore = parse_line_score(&document)?;

    let away = teams::resolve(&meta.away_team)?;
    let home = teams::resolve(&meta.home_team)?;

    Ok(ParsedGame {
        record: GameRecord {
            date: meta.date,
            playoff_info: String::new(),
            away_team_city: away.city,
            home_team_city: home.city,
            away_team_name: away.name,
            home_team_name: home.name,
            away_standings: meta.away_standings,
            home_standings: meta.home_standings,
            game_number: 0,
            boxscore: boxscore.to_delimited(),
            away_batting: away_batting.to_delimited(),
            home_batting: home_batting.to_delimited(),
            away_pitching: away_pitching.to_delimited(),
            home_pitching: home_pitching.to_delimited(),
            big_plays: big_plays.to_delimited(),
        },
        playoff_round: meta.playoff_round,
    })
}

fn parse_meta(document: &Html) -> Result<PageMeta, ScrapeError> {
    let title = page_title(document)?;
    let date = parse_title_date(&title)?;
    let playoff_round = detect_playoff_round(&title);

    let scorebox_selector = Selector::parse("div.scorebox").unwrap();
    let scorebox = document
        .select(&scorebox_selector)
        .next()
        .ok_or_else(|| ScrapeError::MalformedPage("missing scorebox".to_string()))?;

    let div_selector = Selector::parse("div").unwrap();
    let divs: Vec<ElementRef> = scorebox.select(&div_selector).collect();

    let away = divs
        .first()
        .ok_or_else(|| ScrapeError::MalformedPage("scorebox has no team blocks".to_string()))?;
    let (away_team, away_standings) = parse_team_block(*away)?;

    // The home block is normally the seventh descendant div, but an extra
    // wrapper div sometimes sits between the two team blocks. The wrapper
    // carries a class attribute; the real team block does not.
    let home = divs
        .get(6)
        .ok_or_else(|| ScrapeError::MalformedPage("scorebox missing home team block".to_string()))?;
    let home = if home.value().attr("class").is_some() {
        divs.get(7).ok_or_else(|| {
            ScrapeError::MalformedPage("scorebox missing home team block after spacer".to_string())
        })?
    } else {
        home
    };
    let (home_team, home_standings) = parse_team_block(*home)?;

    Ok(PageMeta {
        date,
        playoff_round,
        away_team,
        away_standings,
        home_team,
        home_standings,
    })
}

/// Team name (third anchor) and standings line (fifth inner div) of one
/// scorebox team block.
fn parse_team_block(block: ElementRef) -> Result<(String, String), ScrapeError> {
    let a_selector = Selector::parse("a").unwrap();
    let div_selector = Selector::parse("div").unwrap();

    let name = block
        .select(&a_selector)
        .nth(2)
        .map(element_text)
        .ok_or_else(|| ScrapeError::MalformedPage("team block missing name link".to_string()))?;
    let standings = block
        .select(&div_selector)
        .nth(4)
        .map(element_text)
        .ok_or_else(|| ScrapeError::MalformedPage("team block missing standings".to_string()))?;

    Ok((name, standings))
}

fn page_title(document: &Html) -> Result<String, ScrapeError> {
    let title_selector = Selector::parse("title").unwrap();
    document
        .select(&title_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| ScrapeError::MalformedPage("page has no title".to_string()))
}

/// Title date, `"...: Month DD, YYYY | ..."` converted to ISO.
fn parse_title_date(title: &str) -> Result<String, ScrapeError> {
    let (_, rest) = title.split_once(": ").ok_or_else(|| {
        ScrapeError::MalformedPage(format!("unexpected title format: {:?}", title))
    })?;
    let date_text = rest.split(" |").next().unwrap_or(rest).trim();
    let date = NaiveDate::parse_from_str(date_text, "%B %d, %Y").map_err(|e| {
        ScrapeError::MalformedPage(format!("unparsable game date {:?}: {}", date_text, e))
    })?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn detect_playoff_round(title: &str) -> Option<String> {
    let pattern = Regex::new(ROUND_PATTERN).unwrap();
    pattern.find(title).map(|m| m.as_str().to_string())
}

/// The visible per-inning line score: logo column dropped, team rows only.
fn parse_line_score(document: &Html) -> Result<Grid, ScrapeError> {
    let selector = Selector::parse("table.linescore").unwrap();
    let table = document
        .select(&selector)
        .next()
        .ok_or_else(|| ScrapeError::MalformedPage("missing line score table".to_string()))?;

    let mut grid = tables::parse_grid_html(&table.html())?;
    grid.drop_first_column();
    grid.truncate_rows(2);
    if let Some(first) = grid.header.first_mut() {
        if first.is_empty() {
            *first = "Team".to_string();
        }
    }
    Ok(grid)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::parsers::fixtures::box_score_page;

    fn page(body: String) -> GamePage {
        GamePage {
            url: "https://www.baseball-reference.com/boxes/TST/TST202405030.shtml".to_string(),
            body,
        }
    }

    #[test]
    fn parses_full_page_into_record() {
        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "May 3, 2024",
            None,
            false,
        );
        let parsed = parse_box_score(&page(body)).unwrap();
        let record = parsed.record;

        assert_eq!(record.date, "2024-05-03");
        assert_eq!(record.playoff_info, "");
        assert_eq!(parsed.playoff_round, None);
        assert_eq!(record.game_number, 0);

        assert_eq!(record.away_team_city, "Los Angeles");
        assert_eq!(record.away_team_name, "Dodgers");
        assert_eq!(record.home_team_city, "San Diego");
        assert_eq!(record.home_team_name, "Padres");
        assert_eq!(record.away_standings, "21-11, 1st in NL West");
        assert_eq!(record.home_standings, "17-16, 3rd in NL West");

        // The dropped separator row leaves a gap in the batting index column.
        assert_eq!(
            record.away_batting,
            "|Batting|AB|R|H\n0|Betts RF|4|1|2\n2|Freeman 1B|3|0|1\n"
        );
        assert_eq!(
            record.away_pitching,
            "|Pitching|IP|H|R|ERA\n0|Glasnow|6.0|5|2|2.91\n"
        );
        assert_eq!(
            record.big_plays,
            "|Inn|Score|Big Play\n0|t3|0-1|Home run\n1|b5|2-3|Two-run double\n"
        );
        assert_eq!(
            record.boxscore,
            "|Team|1|2|3|R|H|E\n0|Los Angeles Dodgers|0|1|2|3|7|0\n1|San Diego Padres|2|0|3|5|9|1\n"
        );
    }

    #[test]
    fn home_block_shifts_past_spacer_div() {
        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "May 3, 2024",
            None,
            true,
        );
        let parsed = parse_box_score(&page(body)).unwrap();
        assert_eq!(parsed.record.home_team_name, "Padres");
        assert_eq!(parsed.record.home_standings, "17-16, 3rd in NL West");
    }

    #[test]
    fn playoff_round_token_is_detected() {
        let body = box_score_page(
            "Los Angeles Dodgers",
            "San Diego Padres",
            "October 9, 2024",
            Some("NLDS"),
            false,
        );
        let parsed = parse_box_score(&page(body)).unwrap();
        assert_eq!(parsed.playoff_round.as_deref(), Some("NLDS"));
        assert_eq!(parsed.record.date, "2024-10-09");
        // Composition of playoff_info is the orchestrator's job.
        assert_eq!(parsed.record.playoff_info, "");
    }

    #[test]
    fn unknown_team_fails_the_page() {
        let body = box_score_page(
            "Montreal Expos",
            "San Diego Padres",
            "May 3, 2024",
            None,
            false,
        );
        let err = parse_box_score(&page(body)).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownTeam(_)));
    }

    #[test]
    fn missing_tables_fail_the_page() {
        let body = "<html><head><title>A at B Box Score: May 3, 2024 | x</title></head><body></body></html>";
        let err = parse_box_score(&page(body.to_string())).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedPage(_)));
    }

    #[test]
    fn title_date_conversion() {
        assert_eq!(
            parse_title_date("A at B Box Score: September 28, 2024 | Baseball-Reference.com")
                .unwrap(),
            "2024-09-28"
        );
        assert!(parse_title_date("no colon separated date here").is_err());
        assert!(parse_title_date("Box Score: not a date | x").is_err());
    }

    #[test]
    fn round_tokens() {
        assert_eq!(
            detect_playoff_round("2024 World Series Game 5: ..."),
            Some("World Series".to_string())
        );
        assert_eq!(detect_playoff_round("ALWC: x"), Some("ALWC".to_string()));
        assert_eq!(detect_playoff_round("A at B Box Score: May 3, 2024"), None);
    }
}
