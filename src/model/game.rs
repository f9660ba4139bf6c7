use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One side of a contest (home or away)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSide {
    pub team_id: String,
    pub name: String,
    pub abbrev: String,
    /// Final score as posted by the feed; empty until one is posted.
    /// Kept textual so a garbled feed value stays representable and
    /// distinct from a real zero.
    pub score: String,
}

impl TeamSide {
    /// Parse the posted score as a number, if there is one
    pub fn score_value(&self) -> Option<f64> {
        let s = self.score.trim();
        if s.is_empty() {
            return None;
        }
        s.parse().ok()
    }
}

/// One scheduled contest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Feed-assigned id, stable across refetches; the merge key
    pub id: String,
    /// Regular-season week, 1-18
    pub week: u32,
    /// Kickoff time (UTC); the feed can omit it
    pub date: Option<DateTime<Utc>>,
    /// True once the contest has a final result
    pub completed: bool,
    /// Display-only status line, never consulted for scoring
    pub status_text: String,
    pub home: TeamSide,
    pub away: TeamSide,
}

impl Game {
    pub fn new(id: impl Into<String>, week: u32) -> Self {
        Game {
            id: id.into(),
            week,
            ..Default::default()
        }
    }

    pub fn with_teams(mut self, home_id: &str, away_id: &str) -> Self {
        self.home.team_id = home_id.to_string();
        self.home.abbrev = home_id.to_string();
        self.away.team_id = away_id.to_string();
        self.away.abbrev = away_id.to_string();
        self
    }

    pub fn with_scores(mut self, home: &str, away: &str) -> Self {
        self.home.score = home.to_string();
        self.away.score = away.to_string();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// The winning side's team id, when there is one.
    ///
    /// A game only has a winner once it is completed with two numeric,
    /// unequal scores. A tie or a missing/garbled score means no winner
    /// and the game contributes nothing to any standing.
    pub fn winner_team_id(&self) -> Option<&str> {
        if !self.completed {
            return None;
        }
        let home = self.home.score_value()?;
        let away = self.away.score_value()?;
        if home > away {
            Some(&self.home.team_id)
        } else if away > home {
            Some(&self.away.team_id)
        } else {
            None
        }
    }
}

/// Merge freshly normalized games into the all-time collection.
///
/// Left-biased by recency: each incoming game fully overwrites whatever
/// was stored under its id. There is no field-level patching, so feed
/// refreshes and spreadsheet re-imports compose in any order and the
/// operation is idempotent.
pub fn merge_all(
    mut existing: BTreeMap<String, Game>,
    incoming: impl IntoIterator<Item = Game>,
) -> BTreeMap<String, Game> {
    for game in incoming {
        existing.insert(game.id.clone(), game);
    }
    existing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_home() {
        let game = Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("24", "20")
            .completed();
        assert_eq!(game.winner_team_id(), Some("KC"));
    }

    #[test]
    fn test_winner_away() {
        let game = Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("17", "20")
            .completed();
        assert_eq!(game.winner_team_id(), Some("BUF"));
    }

    #[test]
    fn test_no_winner_until_completed() {
        // Scores can be posted before the status flips to final
        let game = Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("20", "10");
        assert_eq!(game.winner_team_id(), None);
    }

    #[test]
    fn test_no_winner_on_tie() {
        let game = Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("14", "14")
            .completed();
        assert_eq!(game.winner_team_id(), None);
    }

    #[test]
    fn test_no_winner_on_missing_or_garbled_score() {
        let game = Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("24", "")
            .completed();
        assert_eq!(game.winner_team_id(), None);

        let game = Game::new("g1", 1)
            .with_teams("KC", "BUF")
            .with_scores("24", "n/a")
            .completed();
        assert_eq!(game.winner_team_id(), None);
    }

    #[test]
    fn test_score_value_distinguishes_zero_from_absent() {
        let mut side = TeamSide::default();
        assert_eq!(side.score_value(), None);
        side.score = "0".to_string();
        assert_eq!(side.score_value(), Some(0.0));
    }

    #[test]
    fn test_merge_overwrites_by_id() {
        let v1 = Game::new("g1", 1).with_teams("KC", "BUF");
        let mut v2 = v1.clone().with_scores("24", "20").completed();
        v2.status_text = "Final".to_string();

        let all = merge_all(BTreeMap::new(), [v1]);
        let all = merge_all(all, [v2.clone()]);

        assert_eq!(all.len(), 1);
        assert_eq!(all["g1"], v2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let games = vec![
            Game::new("g1", 1).with_teams("KC", "BUF"),
            Game::new("g2", 2).with_teams("DAL", "PHI"),
        ];
        let once = merge_all(BTreeMap::new(), games.clone());
        let twice = merge_all(once.clone(), games);
        assert_eq!(once, twice);
    }
}
