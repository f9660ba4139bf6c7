//! Pick storage with the lock-once-set permission rule.
//!
//! The permission rule is a pure decision function so it can be tested
//! without any storage behind it. The store itself is a plain in-memory
//! map; a persistence collaborator snapshots and restores it wholesale
//! (see `league`). The lock rule is evaluated against the last value
//! known before the write, so a racing storage layer must ensure a
//! losing concurrent writer is told its pick was already locked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::Player;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionError {
    #[error("sign in to make picks")]
    Unauthenticated,

    #[error("players can only set their own picks")]
    NotOwner,

    #[error("you already picked this game; only an admin can change it")]
    AlreadyLocked,
}

/// Outcome of the permission rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickDecision {
    Allowed,
    Denied(PermissionError),
}

/// Decide whether `acting` may set the pick owned by `target_player_id`,
/// given the currently stored value.
///
/// Rules, in order: no authenticated actor is rejected outright; an
/// admin may set anything, including overwriting a locked pick or
/// clearing it; a player may only touch their own row; and a player's
/// own non-empty pick is locked once set. An empty string is an ordinary
/// storable value ("no pick") and does not lock.
pub fn authorize_pick(
    acting: Option<&Player>,
    target_player_id: &str,
    existing: Option<&str>,
) -> PickDecision {
    let Some(actor) = acting else {
        return PickDecision::Denied(PermissionError::Unauthenticated);
    };
    if actor.is_admin() {
        return PickDecision::Allowed;
    }
    if actor.id != target_player_id {
        return PickDecision::Denied(PermissionError::NotOwner);
    }
    match existing {
        Some(value) if !value.is_empty() => PickDecision::Denied(PermissionError::AlreadyLocked),
        _ => PickDecision::Allowed,
    }
}

/// The prediction set for one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamePicks {
    /// Week the game belongs to, when known at write time
    #[serde(default)]
    pub week: Option<u32>,
    /// player id -> chosen team id ("" = no pick)
    #[serde(default)]
    pub predictions: BTreeMap<String, String>,
    /// Refreshed on every successful write to this game's set
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// All picks, keyed by game id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickStore {
    #[serde(default)]
    by_game: BTreeMap<String, GamePicks>,
}

impl PickStore {
    /// The stored pick value for a (game, player) pair, if one was ever
    /// set. An empty string means an explicit "no pick".
    pub fn pick_for(&self, game_id: &str, player_id: &str) -> Option<&str> {
        self.by_game
            .get(game_id)?
            .predictions
            .get(player_id)
            .map(String::as_str)
    }

    pub fn game_picks(&self, game_id: &str) -> Option<&GamePicks> {
        self.by_game.get(game_id)
    }

    /// True if any player has a non-empty pick on this game
    pub fn game_has_picks(&self, game_id: &str) -> bool {
        self.by_game
            .get(game_id)
            .map(|g| g.predictions.values().any(|v| !v.is_empty()))
            .unwrap_or(false)
    }

    /// Number of games with a recorded prediction set
    pub fn games_with_picks(&self) -> usize {
        self.by_game.len()
    }

    /// Set one pick through the permission rule.
    ///
    /// On success the value is stored and the game's `updated_at` is
    /// refreshed. `week` is recorded when the caller knows it; an
    /// already-stored week is kept otherwise.
    pub fn set_pick(
        &mut self,
        game_id: &str,
        player_id: &str,
        team_id: &str,
        week: Option<u32>,
        acting: Option<&Player>,
    ) -> Result<(), PermissionError> {
        let existing = self.pick_for(game_id, player_id);
        if let PickDecision::Denied(reason) = authorize_pick(acting, player_id, existing) {
            return Err(reason);
        }

        let entry = self.by_game.entry(game_id.to_string()).or_default();
        entry
            .predictions
            .insert(player_id.to_string(), team_id.to_string());
        if week.is_some() {
            entry.week = week;
        }
        entry.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Bulk write used by the spreadsheet import path (admin-only at the
    /// surface, so the lock rule does not apply). Merges per player,
    /// overwriting whatever was stored.
    pub fn apply_import(
        &mut self,
        game_id: &str,
        week: Option<u32>,
        predictions: impl IntoIterator<Item = (String, String)>,
    ) {
        let entry = self.by_game.entry(game_id.to_string()).or_default();
        for (player_id, team_id) in predictions {
            entry.predictions.insert(player_id, team_id);
        }
        if week.is_some() {
            entry.week = week;
        }
        entry.updated_at = Some(Utc::now());
    }
}
