//! Game Normalizer: canonical `Game`s out of raw scoreboard payloads.
//!
//! The payload shape is the ESPN scoreboard feed: events carrying a
//! competition with home/away competitors. Fetching the payload is a
//! collaborator's job; this module only normalizes already-retrieved
//! JSON. Normalization never fails on missing optional fields - absent
//! side data becomes empty strings and the game still round-trips.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::model::{Game, TeamSide};

#[derive(Debug, Default, Deserialize)]
pub struct Scoreboard {
    #[serde(default)]
    pub week: Option<WeekInfo>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekInfo {
    #[serde(default)]
    pub number: Option<u32>,
}

/// One raw contest record from the feed
#[derive(Debug, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventStatus {
    #[serde(rename = "type", default)]
    pub kind: Option<StatusType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusType {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub short_detail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    /// Side discriminator: "home" or "away"
    #[serde(default)]
    pub home_away: Option<String>,
    #[serde(default)]
    pub score: Option<ScoreValue>,
    #[serde(default)]
    pub team: Option<TeamInfo>,
}

/// The feed posts scores as strings, but tools re-serializing the
/// payload sometimes turn them into numbers; accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Text(String),
    Number(f64),
}

impl ScoreValue {
    fn to_score_string(&self) -> String {
        match self {
            ScoreValue::Text(s) => s.clone(),
            ScoreValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            ScoreValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

/// Normalize one raw event into a canonical `Game`.
///
/// `completed` comes from the explicit status flag and defaults to
/// false when the status block is missing. Scores are carried as-is
/// when present and left empty when absent.
pub fn normalize_event(event: &Event, week: u32) -> Game {
    let status = event.status.as_ref().and_then(|s| s.kind.as_ref());

    let status_text = status
        .and_then(|t| t.short_detail.clone().or_else(|| t.description.clone()))
        .unwrap_or_else(|| "TBD".to_string());

    Game {
        id: event.id.clone(),
        week,
        date: event.date.as_deref().and_then(parse_feed_date),
        completed: status.map(|t| t.completed).unwrap_or(false),
        status_text,
        home: normalize_side(event, "home"),
        away: normalize_side(event, "away"),
    }
}

fn normalize_side(event: &Event, side: &str) -> TeamSide {
    let competitor = event
        .competitions
        .first()
        .and_then(|c| c.competitors.iter().find(|x| x.home_away.as_deref() == Some(side)));

    let Some(competitor) = competitor else {
        return TeamSide::default();
    };

    let team = competitor.team.as_ref();
    TeamSide {
        team_id: team.and_then(|t| t.id.clone()).unwrap_or_default(),
        name: team.and_then(|t| t.display_name.clone()).unwrap_or_default(),
        abbrev: team.and_then(|t| t.abbreviation.clone()).unwrap_or_default(),
        score: competitor
            .score
            .as_ref()
            .map(ScoreValue::to_score_string)
            .unwrap_or_default(),
    }
}

/// The feed writes kickoff times like "2025-09-07T17:00Z", without
/// seconds, so plain RFC 3339 parsing is not enough.
fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a whole scoreboard payload into normalized games for `week`
pub fn parse_scoreboard(json: &str, week: u32) -> Result<Vec<Game>> {
    let scoreboard: Scoreboard = serde_json::from_str(json)?;
    Ok(scoreboard
        .events
        .iter()
        .map(|e| normalize_event(e, week))
        .collect())
}

/// Detect the live week number from a scoreboard payload, when the feed
/// reports one in the regular-season range
pub fn current_week(json: &str) -> Option<u32> {
    let scoreboard: Scoreboard = serde_json::from_str(json).ok()?;
    scoreboard
        .week
        .and_then(|w| w.number)
        .filter(|w| (1..=18).contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "week": { "number": 3 },
        "events": [
            {
                "id": "401671789",
                "date": "2025-09-21T17:00Z",
                "status": { "type": { "completed": true, "shortDetail": "Final" } },
                "competitions": [
                    {
                        "competitors": [
                            {
                                "homeAway": "home",
                                "score": "24",
                                "team": { "id": "12", "displayName": "Kansas City Chiefs", "abbreviation": "KC" }
                            },
                            {
                                "homeAway": "away",
                                "score": 20,
                                "team": { "id": "2", "displayName": "Buffalo Bills", "abbreviation": "BUF" }
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_scoreboard() {
        let games = parse_scoreboard(SAMPLE, 3).unwrap();
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.id, "401671789");
        assert_eq!(game.week, 3);
        assert!(game.completed);
        assert_eq!(game.status_text, "Final");
        assert_eq!(game.home.team_id, "12");
        assert_eq!(game.home.abbrev, "KC");
        assert_eq!(game.home.score, "24");
        // Numeric score value normalizes to the same text form
        assert_eq!(game.away.score, "20");
        assert_eq!(game.winner_team_id(), Some("12"));
        assert_eq!(
            game.date,
            Some(Utc.with_ymd_and_hms(2025, 9, 21, 17, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_side_yields_empty_fields() {
        let json = r#"{ "events": [ { "id": "x1", "competitions": [ { "competitors": [
            { "homeAway": "home", "team": { "id": "7" } }
        ] } ] } ] }"#;
        let games = parse_scoreboard(json, 1).unwrap();
        let game = &games[0];
        assert_eq!(game.home.team_id, "7");
        assert_eq!(game.home.score, "");
        assert_eq!(game.away.team_id, "");
        assert_eq!(game.away.name, "");
        assert!(!game.completed);
        assert_eq!(game.status_text, "TBD");
    }

    #[test]
    fn test_missing_status_means_not_completed() {
        let json = r#"{ "events": [ { "id": "x1" } ] }"#;
        let games = parse_scoreboard(json, 1).unwrap();
        assert!(!games[0].completed);
        assert_eq!(games[0].winner_team_id(), None);
    }

    #[test]
    fn test_current_week_detection() {
        assert_eq!(current_week(SAMPLE), Some(3));
        assert_eq!(current_week(r#"{ "week": { "number": 25 } }"#), None);
        assert_eq!(current_week(r#"{ "events": [] }"#), None);
        assert_eq!(current_week("not json"), None);
    }

    #[test]
    fn test_rfc3339_date_also_accepted() {
        assert_eq!(
            parse_feed_date("2025-09-21T17:00:00+00:00"),
            Some(Utc.with_ymd_and_hms(2025, 9, 21, 17, 0, 0).unwrap())
        );
        assert_eq!(parse_feed_date("yesterday"), None);
    }
}
