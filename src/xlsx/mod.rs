pub mod reader;
pub mod writer;

pub use reader::{read_picks_workbook, Import};
pub use writer::{write_season_workbook, write_week_csv, write_week_workbook};

/// Fixed leading columns of the pick-sheet schema; player columns follow
pub const FIXED_HEADERS: [&str; 9] = [
    "Week",
    "GameId",
    "DateUTC",
    "HomeTeamId",
    "HomeTeamAbbrev",
    "HomeTeamName",
    "AwayTeamId",
    "AwayTeamAbbrev",
    "AwayTeamName",
];

/// Header matching for import is case-insensitive and ignores spaces,
/// so "Game ID" and "gameid" are the same column
pub(crate) fn normalize_header(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Sheet names are capped at Excel's 31-character limit
pub(crate) fn week_sheet_name(week: u32) -> String {
    let mut name = format!("Week{}", week);
    name.truncate(31);
    name
}
