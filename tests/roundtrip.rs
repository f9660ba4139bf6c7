//! Export -> import round trip through real workbook files.

use pickem::league::League;
use pickem::model::{Game, Player, Role};
use pickem::store::PickStore;
use pickem::xlsx;

fn sample_league() -> League {
    let mut league = League::default();
    league.players = vec![
        Player::new("p1", "Ed", Role::Admin),
        Player::new("p2", "Teddy", Role::Player),
        Player::new("p3", "Murk", Role::Player),
    ];

    league.merge_games(vec![
        Game::new("401671789", 1)
            .with_teams("12", "2")
            .with_scores("24", "20")
            .completed(),
        Game::new("401671790", 1).with_teams("6", "21"),
        Game::new("401671801", 2)
            .with_teams("25", "26")
            .with_scores("17", "31")
            .completed(),
    ]);

    league.picks.apply_import(
        "401671789",
        Some(1),
        [
            ("p1".to_string(), "12".to_string()),
            ("p2".to_string(), "2".to_string()),
        ],
    );
    league.picks.apply_import(
        "401671790",
        Some(1),
        [("p3".to_string(), "21".to_string())],
    );
    league.picks.apply_import(
        "401671801",
        Some(2),
        [("p1".to_string(), "26".to_string())],
    );

    league
}

#[test]
fn season_workbook_round_trips_picks_and_weeks() {
    let league = sample_league();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all-weeks.xlsx");
    xlsx::write_season_workbook(&path, &league).unwrap();

    let import = xlsx::read_picks_workbook(&path).unwrap();

    // Every exported game came back, keyed the same, weeks intact; the
    // summary sheets have no GameId column and are ignored
    assert_eq!(import.game_count(), 3);
    assert_eq!(import.games["401671789"].week, Some(1));
    assert_eq!(import.games["401671801"].week, Some(2));
    assert_eq!(
        import.weeks_to_refresh.iter().copied().collect::<Vec<_>>(),
        vec![1, 2]
    );

    // Applying to a fresh store reproduces the pick mapping exactly
    let mut store = PickStore::default();
    import.apply(&mut store, &league.players);

    assert_eq!(store.pick_for("401671789", "p1"), Some("12"));
    assert_eq!(store.pick_for("401671789", "p2"), Some("2"));
    assert_eq!(store.pick_for("401671789", "p3"), None);
    assert_eq!(store.pick_for("401671790", "p3"), Some("21"));
    assert_eq!(store.pick_for("401671801", "p1"), Some("26"));
}

#[test]
fn week_workbook_round_trips() {
    let league = sample_league();
    let games = league.games_for_week(1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week1.xlsx");
    xlsx::write_week_workbook(&path, 1, &games, &league.picks, &league.players).unwrap();

    let import = xlsx::read_picks_workbook(&path).unwrap();
    assert_eq!(import.game_count(), 2);
    assert_eq!(import.games["401671789"].picks["Ed"], "12");
    assert_eq!(import.games["401671789"].picks["Teddy"], "2");
    assert!(!import.games["401671790"].picks.contains_key("Ed"));
}

#[test]
fn reimporting_an_export_changes_nothing() {
    let mut league = sample_league();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all-weeks.xlsx");
    xlsx::write_season_workbook(&path, &league).unwrap();

    let before = league.picks.clone();
    let import = xlsx::read_picks_workbook(&path).unwrap();
    let players = league.players.clone();
    import.apply(&mut league.picks, &players);

    for game_id in ["401671789", "401671790", "401671801"] {
        for player in &players {
            assert_eq!(
                league.picks.pick_for(game_id, &player.id),
                before.pick_for(game_id, &player.id),
                "pick drifted for ({}, {})",
                game_id,
                player.id
            );
        }
    }
}
