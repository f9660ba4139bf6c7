//! Serialized league state: roster, all-time game collection, picks.
//!
//! This is the storage collaborator for the CLI. The scoring core never
//! requires it - standings and season detail are computed from whatever
//! `Game`/`Pick`/`Player` state the caller holds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{PickemError, Result};
use crate::model::{merge_all, Game, Player};
use crate::store::PickStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub players: Vec<Player>,
    /// All-time game collection, keyed by game id
    #[serde(default)]
    pub games: BTreeMap<String, Game>,
    #[serde(default)]
    pub picks: PickStore,
}

impl League {
    pub fn load(path: &Path) -> Result<League> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| PickemError::League(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Merge freshly normalized games into the all-time collection
    pub fn merge_games(&mut self, incoming: Vec<Game>) {
        let games = std::mem::take(&mut self.games);
        self.games = merge_all(games, incoming);
    }

    /// Games belonging to one week, in kickoff order (date, then id)
    pub fn games_for_week(&self, week: u32) -> Vec<&Game> {
        let mut games: Vec<&Game> = self.games.values().filter(|g| g.week == week).collect();
        games.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        games
    }

    /// Sorted unique week numbers present in the game collection
    pub fn weeks(&self) -> Vec<u32> {
        let mut weeks: Vec<u32> = self.games.values().map(|g| g.week).collect();
        weeks.sort_unstable();
        weeks.dedup();
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn test_save_load_round_trip() {
        let mut league = League::default();
        league.players.push(Player::new("p1", "Ed", Role::Admin));
        league.merge_games(vec![Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("24", "20")
            .completed()]);
        league
            .picks
            .apply_import("g1", Some(1), [("p1".to_string(), "KC".to_string())]);

        let file = tempfile::NamedTempFile::new().unwrap();
        league.save(file.path()).unwrap();
        let loaded = League::load(file.path()).unwrap();

        assert_eq!(loaded.players, league.players);
        assert_eq!(loaded.games, league.games);
        assert_eq!(loaded.picks.pick_for("g1", "p1"), Some("KC"));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "not json").unwrap();
        assert!(matches!(
            League::load(file.path()),
            Err(PickemError::League(_))
        ));
    }

    #[test]
    fn test_games_for_week_kickoff_order() {
        let early = Utc.with_ymd_and_hms(2025, 9, 7, 17, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 9, 8, 0, 20, 0).unwrap();

        let mut league = League::default();
        league.merge_games(vec![
            Game::new("b", 1).with_date(late),
            Game::new("c", 1).with_date(early),
            Game::new("a", 1).with_date(early),
            Game::new("d", 2).with_date(early),
        ]);

        let ids: Vec<_> = league.games_for_week(1).iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
        assert_eq!(league.weeks(), vec![1, 2]);
    }
}
