//! Spreadsheet import: picks workbooks back into the store.
//!
//! Parsing is split from file I/O: `parse_sheets` works over plain
//! string grids so the row semantics are testable without a workbook on
//! disk. Malformed rows are skipped, never fatal - an import pass
//! always completes and reports what it took.

use calamine::{open_workbook_auto, Data, Reader};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::{normalize_header, FIXED_HEADERS};
use crate::error::Result;
use crate::model::Player;
use crate::store::PickStore;

/// One sheet's cells as text, header row split off
#[derive(Debug, Clone)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything gathered for one game id across all imported rows
#[derive(Debug, Clone, Default)]
pub struct ImportedGame {
    /// In-range (1-18) week, when the row carried one
    pub week: Option<u32>,
    /// Column header (player name) -> picked team id
    pub picks: BTreeMap<String, String>,
}

/// Aggregated result of an import pass
#[derive(Debug, Clone, Default)]
pub struct Import {
    pub games: BTreeMap<String, ImportedGame>,
    /// Week numbers seen in-range; these are the weeks a feed
    /// collaborator should refetch so imported picks have games to
    /// score against
    pub weeks_to_refresh: BTreeSet<u32>,
}

impl Import {
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Write the imported picks into the store. Player columns resolve
    /// against roster names; columns naming nobody on the roster are
    /// ignored. Returns the number of games imported.
    pub fn apply(&self, store: &mut PickStore, players: &[Player]) -> usize {
        for (game_id, imported) in &self.games {
            let predictions: Vec<(String, String)> = players
                .iter()
                .filter_map(|p| {
                    imported
                        .picks
                        .get(p.name.trim())
                        .map(|team| (p.id.clone(), team.clone()))
                })
                .collect();
            store.apply_import(game_id, imported.week, predictions);
        }
        self.games.len()
    }
}

/// A week cell only counts when it is a whole number in the
/// regular-season range; anything else is ignored for refetch planning
/// while the row's picks still import
fn parse_week(s: &str) -> Option<u32> {
    let n: f64 = s.trim().parse().ok()?;
    if n.fract() == 0.0 && (1.0..=18.0).contains(&n) {
        Some(n as u32)
    } else {
        None
    }
}

/// Concatenate and parse all sheets of an import.
///
/// `GameId`/`Week` headers match case-insensitively ignoring spaces.
/// Rows with an empty trimmed game id are discarded. Any non-schema
/// column is treated as a player column keyed by its header.
pub fn parse_sheets(sheets: &[Sheet]) -> Import {
    let fixed: BTreeSet<String> = FIXED_HEADERS.iter().map(|h| normalize_header(h)).collect();
    let mut import = Import::default();

    for sheet in sheets {
        let norm: Vec<String> = sheet.headers.iter().map(|h| normalize_header(h)).collect();
        let Some(game_col) = norm.iter().position(|h| h.as_str() == "gameid") else {
            log::warn!("sheet without a GameId column; skipping {} rows", sheet.rows.len());
            continue;
        };
        let week_col = norm.iter().position(|h| h.as_str() == "week");

        for row in &sheet.rows {
            let game_id = row.get(game_col).map(|s| s.trim()).unwrap_or("");
            if game_id.is_empty() {
                continue;
            }
            let entry = import.games.entry(game_id.to_string()).or_default();

            if let Some(week) = week_col.and_then(|c| row.get(c)).and_then(|s| parse_week(s)) {
                entry.week = Some(week);
                import.weeks_to_refresh.insert(week);
            }

            for (col, header) in sheet.headers.iter().enumerate() {
                if fixed.contains(&norm[col]) {
                    continue;
                }
                let Some(value) = row.get(col) else { continue };
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                entry.picks.insert(header.trim().to_string(), value.to_string());
            }
        }
    }

    import
}

/// Spreadsheet tools round-trip numeric text as floats; "401547.0"
/// comes back as the integer text it started as
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Read every sheet of a picks workbook and parse the concatenated rows
pub fn read_picks_workbook(path: &Path) -> Result<Import> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let mut rows = range
            .rows()
            .map(|r| r.iter().map(cell_to_string).collect::<Vec<String>>());
        let Some(headers) = rows.next() else { continue };
        sheets.push(Sheet {
            headers,
            rows: rows.collect(),
        });
    }

    Ok(parse_sheets(&sheets))
}
