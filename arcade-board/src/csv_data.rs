//! Progress CSV parsing.
//!
//! The scraper writes one header row followed by one row per participant. Columns
//! are located by header name, so extra columns (email, access flags) are ignored
//! and the file may be reordered without breaking the board.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::records::ParticipantRecord;

const USER_NAME_HEADERS: &[&str] = &["user name", "username", "name", "participant"];
const SKILL_BADGE_HEADERS: &[&str] = &["# of skill badges", "skill badges", "badges", "badge count"];
const ARCADE_GAME_HEADERS: &[&str] = &["# of arcade games", "arcade games", "games", "game count"];
const COMPLETION_TIME_HEADERS: &[&str] =
    &["completion time", "completed at", "last updated", "timestamp"];
const PROFILE_URL_HEADERS: &[&str] = &[
    "google cloud skills boost profile url",
    "profile url",
    "profile",
];
const BADGE_NAME_HEADERS: &[&str] = &["names of skill badges", "skill badge names"];
const GAME_NAME_HEADERS: &[&str] = &["names of completed arcade games", "arcade game names"];

/// Column positions resolved from the header row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub user_name: Option<usize>,
    pub skill_badges: Option<usize>,
    pub arcade_games: Option<usize>,
    pub completion_time: Option<usize>,
    pub profile_url: Option<usize>,
    pub badge_names: Option<usize>,
    pub game_names: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|header| header == alias))
        };
        Self {
            user_name: find(USER_NAME_HEADERS),
            skill_badges: find(SKILL_BADGE_HEADERS),
            arcade_games: find(ARCADE_GAME_HEADERS),
            completion_time: find(COMPLETION_TIME_HEADERS),
            profile_url: find(PROFILE_URL_HEADERS),
            badge_names: find(BADGE_NAME_HEADERS),
            game_names: find(GAME_NAME_HEADERS),
        }
    }
}

/// Parse a CSV payload into participant records.
///
/// Blank lines, delimiter-only lines, rows whose cells are all empty and rows
/// without a user name are dropped. Nothing here fails: a bad row only costs
/// that row.
pub fn parse_participants(text: &str) -> Vec<ParticipantRecord> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => ColumnMap::from_headers(headers),
        Err(err) => {
            debug!(?err, "unreadable csv header");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                debug!(?err, "skipping unreadable csv row");
                dropped += 1;
                continue;
            }
        };
        match build_record(&columns, &row, records.len()) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(kept = records.len(), dropped, "dropped malformed csv rows");
    }
    records
}

fn build_record(columns: &ColumnMap, row: &StringRecord, row_index: usize) -> Option<ParticipantRecord> {
    if row.iter().all(|cell| cell.trim().is_empty()) {
        return None;
    }

    let user_name = cell(row, columns.user_name).trim();
    if user_name.is_empty() {
        return None;
    }

    Some(ParticipantRecord {
        user_name: user_name.to_string(),
        completion_time: cell(row, columns.completion_time).trim().to_string(),
        skill_badges: parse_count(cell(row, columns.skill_badges)),
        arcade_games: parse_count(cell(row, columns.arcade_games)),
        profile_url: cell(row, columns.profile_url).trim().to_string(),
        badge_names: split_names(cell(row, columns.badge_names)),
        game_names: split_names(cell(row, columns.game_names)),
        row_index,
    })
}

fn cell(row: &StringRecord, index: Option<usize>) -> &str {
    index.and_then(|index| row.get(index)).unwrap_or("")
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Counts are whole numbers; anything unparseable or negative is zero.
pub fn parse_count(value: &str) -> u32 {
    let value = value.trim();
    if let Ok(count) = value.parse::<u32>() {
        return count;
    }
    match value.parse::<f64>() {
        Ok(count) if count.is_finite() && count > 0.0 => count.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_board_and_skips_delimiter_lines() {
        let records = parse_participants("User Name,Badges\nAlice,5\n,,\nBob,3\n");
        let names: Vec<&str> = records.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(records[0].skill_badges, 5);
        assert_eq!(records[1].skill_badges, 3);
        assert_eq!(records[1].row_index, 1);
    }

    #[test]
    fn drops_rows_without_user_name() {
        let text = "User Name,Badges,Games\n   ,4,1\n,2,2\nCara,1,0\n";
        let records = parse_participants(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_name, "Cara");
        assert_eq!(records[0].row_index, 0);
    }

    #[test]
    fn blank_and_whitespace_lines_are_ignored() {
        let text = "User Name,Badges\n\n   \nDana,2\n , , \n\r\n";
        let records = parse_participants(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_name, "Dana");
    }

    #[test]
    fn reads_scraper_summary_columns() {
        let text = concat!(
            "User Name,Email,Google Cloud Skills Boost Profile URL,Access,UR,Co,",
            "# of Skill Badges,Names of Skill Badges,# of Arcade Games,Names of Completed Arcade Games\n",
            "Sample User,,https://www.cloudskillsboost.google.com/public_profiles/abc,All Good,Yes,No,",
            "2,\"Build a Secure Google Cloud Network, Set Up an App Dev Environment\",1,Arcade Trivia\n",
        );
        let records = parse_participants(text);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.skill_badges, 2);
        assert_eq!(record.arcade_games, 1);
        assert_eq!(
            record.profile_url,
            "https://www.cloudskillsboost.google.com/public_profiles/abc"
        );
        assert_eq!(
            record.badge_names,
            vec![
                "Build a Secure Google Cloud Network".to_string(),
                "Set Up an App Dev Environment".to_string()
            ]
        );
        assert_eq!(record.game_names, vec!["Arcade Trivia".to_string()]);
    }

    #[test]
    fn header_lookup_ignores_case_and_spacing() {
        let records = parse_participants("  user   NAME , Completion Time\nEve, 2024-05-01 \n");
        assert_eq!(records[0].user_name, "Eve");
        assert_eq!(records[0].completion_time, "2024-05-01");
        assert_eq!(records[0].score(), 0);
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let records = parse_participants("User Name,Badges,Games\nFinn\nGus,1,2,extra\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].skill_badges, 0);
        assert_eq!(records[1].arcade_games, 2);
    }

    #[test]
    fn empty_and_header_only_inputs_yield_nothing() {
        assert!(parse_participants("").is_empty());
        assert!(parse_participants("User Name,Badges\n").is_empty());
        assert!(parse_participants("\u{feff}User Name,Badges\n,,\n").is_empty());
    }

    #[test]
    fn counts_are_lenient() {
        assert_eq!(parse_count("7"), 7);
        assert_eq!(parse_count(" 3 "), 3);
        assert_eq!(parse_count("4.0"), 4);
        assert_eq!(parse_count("-2"), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn parsing_twice_is_identical() {
        let text = "User Name,Badges\nAlice,5\nBob,3\n";
        assert_eq!(parse_participants(text), parse_participants(text));
    }
}
