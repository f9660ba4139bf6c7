use chrono::SecondsFormat;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

use super::{week_sheet_name, FIXED_HEADERS};
use crate::error::Result;
use crate::league::League;
use crate::model::{compute_standings, Game, Player};
use crate::store::PickStore;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin)
}

fn date_cell(game: &Game) -> String {
    game.date
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Write one week's games and picks in the fixed row schema, one player
/// column per roster entry
fn write_pick_sheet(
    sheet: &mut Worksheet,
    games: &[&Game],
    picks: &PickStore,
    players: &[Player],
) -> Result<()> {
    let widths = [6, 14, 22, 12, 16, 24, 12, 16, 24];
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    for i in 0..players.len() {
        sheet.set_column_width((FIXED_HEADERS.len() + i) as u16, 12)?;
    }

    let header = header_format();
    for (col, name) in FIXED_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (i, player) in players.iter().enumerate() {
        let col = (FIXED_HEADERS.len() + i) as u16;
        sheet.write_string_with_format(0, col, &player.name, &header)?;
    }

    let center = Format::new().set_align(FormatAlign::Center);
    let left = Format::new().set_align(FormatAlign::Left);

    for (row_idx, game) in games.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet.write_number_with_format(row, 0, game.week as f64, &center)?;
        sheet.write_string_with_format(row, 1, &game.id, &left)?;
        sheet.write_string_with_format(row, 2, &date_cell(game), &left)?;
        sheet.write_string_with_format(row, 3, &game.home.team_id, &center)?;
        sheet.write_string_with_format(row, 4, &game.home.abbrev, &center)?;
        sheet.write_string_with_format(row, 5, &game.home.name, &left)?;
        sheet.write_string_with_format(row, 6, &game.away.team_id, &center)?;
        sheet.write_string_with_format(row, 7, &game.away.abbrev, &center)?;
        sheet.write_string_with_format(row, 8, &game.away.name, &left)?;

        for (i, player) in players.iter().enumerate() {
            let pick = picks.pick_for(&game.id, &player.id).unwrap_or("");
            if !pick.is_empty() {
                let col = (FIXED_HEADERS.len() + i) as u16;
                sheet.write_string_with_format(row, col, pick, &center)?;
            }
        }
    }

    Ok(())
}

/// Export a single week's visible games as a one-sheet workbook
pub fn write_week_workbook(
    path: &Path,
    week: u32,
    games: &[&Game],
    picks: &PickStore,
    players: &[Player],
) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(week_sheet_name(week))?;
    write_pick_sheet(sheet, games, picks, players)?;
    workbook.save(path)?;
    Ok(())
}

/// Same single-scope export, as CSV
pub fn write_week_csv(
    path: &Path,
    games: &[&Game],
    picks: &PickStore,
    players: &[Player],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut headers: Vec<&str> = FIXED_HEADERS.to_vec();
    headers.extend(players.iter().map(|p| p.name.as_str()));
    writer.write_record(&headers)?;

    for game in games {
        let mut record = vec![
            game.week.to_string(),
            game.id.clone(),
            date_cell(game),
            game.home.team_id.clone(),
            game.home.abbrev.clone(),
            game.home.name.clone(),
            game.away.team_id.clone(),
            game.away.abbrev.clone(),
            game.away.name.clone(),
        ];
        for player in players {
            record.push(
                picks
                    .pick_for(&game.id, &player.id)
                    .unwrap_or("")
                    .to_string(),
            );
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export the whole season: one pick sheet per week present in the
/// all-time collection, a ranked season-summary sheet, and a
/// win-percentage-only sheet for charting.
///
/// Percentage cells hold fractional values in [0,1] with a percentage
/// number format, never pre-multiplied.
pub fn write_season_workbook(path: &Path, league: &League) -> Result<()> {
    let mut workbook = Workbook::new();

    for week in league.weeks() {
        let games = league.games_for_week(week);
        let sheet = workbook.add_worksheet();
        sheet.set_name(week_sheet_name(week))?;
        write_pick_sheet(sheet, &games, &league.picks, &league.players)?;
    }

    let standings = compute_standings(league.games.values(), &league.picks, &league.players);

    let header = header_format();
    let center = Format::new().set_align(FormatAlign::Center);
    let left = Format::new().set_align(FormatAlign::Left);
    let pct = Format::new()
        .set_align(FormatAlign::Right)
        .set_num_format("0.00%");

    let summary = workbook.add_worksheet();
    summary.set_name("Season_Summary")?;
    summary.set_column_width(1, 20)?;
    for (col, name) in ["Rank", "Player", "Correct", "Total", "WinPct"]
        .iter()
        .enumerate()
    {
        summary.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (idx, standing) in standings.iter().enumerate() {
        let row = (idx + 1) as u32;
        summary.write_number_with_format(row, 0, (idx + 1) as f64, &center)?;
        summary.write_string_with_format(row, 1, &standing.display_name, &left)?;
        summary.write_number_with_format(row, 2, standing.correct as f64, &center)?;
        summary.write_number_with_format(row, 3, standing.total as f64, &center)?;
        summary.write_number_with_format(row, 4, standing.pct, &pct)?;
    }

    let chart_data = workbook.add_worksheet();
    chart_data.set_name("WinPct_Data")?;
    chart_data.set_column_width(0, 20)?;
    chart_data.write_string_with_format(0, 0, "Player", &header)?;
    chart_data.write_string_with_format(0, 1, "WinPct", &header)?;
    for (idx, standing) in standings.iter().enumerate() {
        let row = (idx + 1) as u32;
        chart_data.write_string_with_format(row, 0, &standing.display_name, &left)?;
        chart_data.write_number_with_format(row, 1, standing.pct, &pct)?;
    }

    workbook.save(path)?;
    Ok(())
}
