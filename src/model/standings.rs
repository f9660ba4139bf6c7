//! Standings engine: win/loss aggregation over games and picks.
//!
//! Weekly and season standings are the same computation over different
//! game slices. Everything here is a pure function over current state,
//! recomputed on demand and never persisted.

use std::cmp::Ordering;
use std::fmt;

use crate::model::{Game, Player};
use crate::store::PickStore;

/// One player's aggregate record within a scope
#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub player_id: String,
    pub display_name: String,
    pub correct: u32,
    pub total: u32,
    pub pct: f64,
}

/// Compute ranked standings for a slice of games.
///
/// Every roster player gets a row, picks or not. Games without a winner
/// (not completed, tied, or with unparsable scores) are skipped outright
/// and count for nobody. Sorting is stable: `correct` descending, then
/// `pct` descending, with roster order preserved on full ties - the
/// caller's roster order is part of the contract.
pub fn compute_standings<'a>(
    games: impl IntoIterator<Item = &'a Game>,
    picks: &PickStore,
    players: &[Player],
) -> Vec<StandingRow> {
    let mut tally = vec![(0u32, 0u32); players.len()];

    for game in games {
        let Some(winner) = game.winner_team_id() else {
            continue;
        };
        for (slot, player) in tally.iter_mut().zip(players) {
            let Some(pick) = picks.pick_for(&game.id, &player.id) else {
                continue;
            };
            if pick.is_empty() {
                continue;
            }
            slot.1 += 1;
            if pick == winner {
                slot.0 += 1;
            }
        }
    }

    let mut rows: Vec<StandingRow> = players
        .iter()
        .zip(tally)
        .map(|(player, (correct, total))| StandingRow {
            player_id: player.id.clone(),
            display_name: player.display_name().to_string(),
            correct,
            total,
            pct: if total > 0 {
                correct as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect();

    // Vec::sort_by is stable, which is what makes the tie order deterministic
    rows.sort_by(|a, b| {
        b.correct
            .cmp(&a.correct)
            .then(b.pct.partial_cmp(&a.pct).unwrap_or(Ordering::Equal))
    });

    rows
}

/// Outcome of a single pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    Win,
    Loss,
    /// The game has not resolved to a winner: not completed yet, tied,
    /// or missing a usable score
    Pending,
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickResult::Win => write!(f, "win"),
            PickResult::Loss => write!(f, "loss"),
            PickResult::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    pub pct: f64,
}

/// One entry in a player's season log
#[derive(Debug, Clone)]
pub struct PickRecord<'a> {
    pub game: &'a Game,
    pub team_id: String,
    pub result: PickResult,
}

/// A player's full-season breakdown
#[derive(Debug, Clone)]
pub struct SeasonDetail<'a> {
    pub stats: SeasonStats,
    pub picks: Vec<PickRecord<'a>>,
}

/// Per-player season detail: every pick the player made, classified as
/// win/loss/pending.
///
/// Pending picks appear in the log but stay out of the counts, so
/// `incorrect` is always exactly `total - correct`. The log is ordered
/// by (week, date) ascending - the canonical chronology; "recent picks"
/// is the tail of it.
pub fn season_detail<'a>(
    player_id: &str,
    games: impl IntoIterator<Item = &'a Game>,
    picks: &PickStore,
) -> SeasonDetail<'a> {
    let mut stats = SeasonStats::default();
    let mut log = Vec::new();

    for game in games {
        let Some(team_id) = picks.pick_for(&game.id, player_id) else {
            continue;
        };
        if team_id.is_empty() {
            continue;
        }

        let result = match game.winner_team_id() {
            Some(winner) if winner == team_id => {
                stats.correct += 1;
                stats.total += 1;
                PickResult::Win
            }
            Some(_) => {
                stats.incorrect += 1;
                stats.total += 1;
                PickResult::Loss
            }
            None => PickResult::Pending,
        };

        log.push(PickRecord {
            game,
            team_id: team_id.to_string(),
            result,
        });
    }

    stats.pct = if stats.total > 0 {
        stats.correct as f64 / stats.total as f64
    } else {
        0.0
    };

    log.sort_by(|a, b| {
        a.game
            .week
            .cmp(&b.game.week)
            .then(a.game.date.cmp(&b.game.date))
    });

    SeasonDetail { stats, picks: log }
}
