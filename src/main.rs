use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use pickem::league::League;
use pickem::model::{compute_standings, load_roster, season_detail};
use pickem::{feed, xlsx};

#[derive(Parser)]
#[command(name = "pickem")]
#[command(about = "Track pick'em predictions, score them, and build standings spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new league file
    Init {
        /// League file to create
        league: PathBuf,

        /// Roster CSV (id,name,nickname,role,initials,color)
        #[arg(long)]
        roster: Option<PathBuf>,
    },

    /// Replace the league roster from a CSV file
    Roster {
        league: PathBuf,

        /// Roster CSV (id,name,nickname,role,initials,color)
        roster: PathBuf,
    },

    /// Merge scoreboard JSON snapshots into the game collection
    Refresh {
        league: PathBuf,

        /// Scoreboard payload file(s), one per week
        #[arg(long, required = true)]
        scoreboard: Vec<PathBuf>,

        /// Week number override when a payload does not report one
        #[arg(long)]
        week: Option<u32>,
    },

    /// Set one player's pick for a game
    Pick {
        league: PathBuf,

        /// Game id
        #[arg(long)]
        game: String,

        /// Player whose pick this is
        #[arg(long)]
        player: String,

        /// Chosen team id; empty clears the pick
        #[arg(long, default_value = "")]
        team: String,

        /// Acting (signed-in) player id
        #[arg(long)]
        acting: Option<String>,
    },

    /// Show ranked standings (season, or one week)
    Standings {
        league: PathBuf,

        #[arg(long)]
        week: Option<u32>,
    },

    /// Show one player's season log
    Detail {
        league: PathBuf,

        #[arg(long)]
        player: String,
    },

    /// Export picks to a spreadsheet
    Export {
        league: PathBuf,

        /// Output file (.xlsx; single-week export also accepts .csv)
        #[arg(short, long)]
        output: PathBuf,

        /// Export a single week instead of the full season workbook
        #[arg(long)]
        week: Option<u32>,

        /// Leave out games nobody has picked (single-week export)
        #[arg(long)]
        picked_only: bool,
    },

    /// Import picks from a workbook (admin only)
    Import {
        league: PathBuf,

        /// Picks workbook to read
        input: PathBuf,

        /// Acting player id; must be an admin
        #[arg(long)]
        acting: String,
    },

    /// Display information about a league file
    Info { league: PathBuf },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { league, roster } => init(&league, roster.as_deref())?,
        Commands::Roster { league, roster } => replace_roster(&league, &roster)?,
        Commands::Refresh {
            league,
            scoreboard,
            week,
        } => refresh(&league, &scoreboard, week)?,
        Commands::Pick {
            league,
            game,
            player,
            team,
            acting,
        } => set_pick(&league, &game, &player, &team, acting.as_deref())?,
        Commands::Standings { league, week } => standings(&league, week)?,
        Commands::Detail { league, player } => detail(&league, &player)?,
        Commands::Export {
            league,
            output,
            week,
            picked_only,
        } => export(&league, &output, week, picked_only)?,
        Commands::Import {
            league,
            input,
            acting,
        } => import(&league, &input, &acting)?,
        Commands::Info { league } => info(&league)?,
    }

    Ok(())
}

fn init(path: &Path, roster: Option<&Path>) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let mut league = League::default();
    if let Some(roster_path) = roster {
        league.players = load_roster(roster_path).context("Failed to read roster CSV")?;
        println!("Loaded {} players", league.players.len());
    }

    league.save(path).context("Failed to write league file")?;
    println!("Created {}", path.display());
    Ok(())
}

fn replace_roster(path: &Path, roster: &Path) -> Result<()> {
    let mut league = League::load(path).context("Failed to read league file")?;
    league.players = load_roster(roster).context("Failed to read roster CSV")?;
    league.save(path).context("Failed to write league file")?;

    println!("Roster now has {} players:", league.players.len());
    for player in &league.players {
        println!("  {} - {} ({})", player.id, player.display_name(), player.role);
    }
    Ok(())
}

fn refresh(path: &Path, scoreboards: &[PathBuf], week_override: Option<u32>) -> Result<()> {
    let mut league = League::load(path).context("Failed to read league file")?;

    let mut merged = 0usize;
    for file in scoreboards {
        let json = match fs::read_to_string(file) {
            Ok(json) => json,
            Err(e) => {
                // Degrade per file: the rest of the refresh still runs
                println!("Warning: could not read {}: {}", file.display(), e);
                continue;
            }
        };

        let week = week_override.or_else(|| feed::current_week(&json));
        let Some(week) = week else {
            println!(
                "Warning: {} reports no week number; pass --week to merge it",
                file.display()
            );
            continue;
        };

        match feed::parse_scoreboard(&json, week) {
            Ok(games) => {
                println!("{}: {} games for week {}", file.display(), games.len(), week);
                merged += games.len();
                league.merge_games(games);
            }
            Err(e) => {
                println!("Warning: could not parse {}: {}", file.display(), e);
            }
        }
    }

    league.save(path).context("Failed to write league file")?;
    println!(
        "Merged {} games; collection now holds {} across {} weeks",
        merged,
        league.games.len(),
        league.weeks().len()
    );
    Ok(())
}

fn set_pick(
    path: &Path,
    game_id: &str,
    player_id: &str,
    team_id: &str,
    acting_id: Option<&str>,
) -> Result<()> {
    let mut league = League::load(path).context("Failed to read league file")?;

    if league.player(player_id).is_none() {
        bail!("No player with id {:?} on the roster", player_id);
    }

    let acting = match acting_id {
        Some(id) => Some(
            league
                .player(id)
                .with_context(|| format!("No player with id {:?} on the roster", id))?
                .clone(),
        ),
        None => None,
    };

    let week = league.games.get(game_id).map(|g| g.week);
    league
        .picks
        .set_pick(game_id, player_id, team_id, week, acting.as_ref())?;
    league.save(path).context("Failed to write league file")?;

    if team_id.is_empty() {
        println!("Cleared {}'s pick for game {}", player_id, game_id);
    } else {
        println!("Saved {}'s pick for game {}: {}", player_id, game_id, team_id);
    }
    Ok(())
}

fn standings(path: &Path, week: Option<u32>) -> Result<()> {
    let league = League::load(path).context("Failed to read league file")?;

    let rows = match week {
        Some(week) => {
            println!("Week {} standings", week);
            compute_standings(
                league.games_for_week(week).into_iter(),
                &league.picks,
                &league.players,
            )
        }
        None => {
            println!("Season standings ({} games loaded)", league.games.len());
            compute_standings(league.games.values(), &league.picks, &league.players)
        }
    };

    println!();
    println!("{:<5} {:<20} {:>8} {:>7} {:>7}", "Rank", "Player", "Correct", "Total", "Win%");
    for (idx, row) in rows.iter().enumerate() {
        println!(
            "{:<5} {:<20} {:>8} {:>7} {:>6.1}%",
            idx + 1,
            row.display_name,
            row.correct,
            row.total,
            row.pct * 100.0
        );
    }
    Ok(())
}

fn detail(path: &Path, player_id: &str) -> Result<()> {
    let league = League::load(path).context("Failed to read league file")?;
    let player = league
        .player(player_id)
        .with_context(|| format!("No player with id {:?} on the roster", player_id))?;

    let detail = season_detail(player_id, league.games.values(), &league.picks);

    println!("{} - season to date", player.display_name());
    println!(
        "  {} correct / {} incorrect of {} scored ({:.1}%)",
        detail.stats.correct,
        detail.stats.incorrect,
        detail.stats.total,
        detail.stats.pct * 100.0
    );
    println!();

    for record in &detail.picks {
        let game = record.game;
        let matchup = format!(
            "{} @ {}",
            if game.away.abbrev.is_empty() { "?" } else { game.away.abbrev.as_str() },
            if game.home.abbrev.is_empty() { "?" } else { game.home.abbrev.as_str() },
        );
        println!(
            "  Week {:<2} {:<12} picked {:<4} {}",
            game.week, matchup, record.team_id, record.result
        );
    }
    Ok(())
}

fn export(path: &Path, output: &Path, week: Option<u32>, picked_only: bool) -> Result<()> {
    let league = League::load(path).context("Failed to read league file")?;

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match week {
        Some(week) => {
            let mut games = league.games_for_week(week);
            if picked_only {
                games.retain(|g| league.picks.game_has_picks(&g.id));
            }
            if games.is_empty() {
                bail!("No games to export for week {}", week);
            }
            match ext.as_str() {
                "xlsx" => xlsx::write_week_workbook(
                    output,
                    week,
                    &games,
                    &league.picks,
                    &league.players,
                )?,
                "csv" => xlsx::write_week_csv(output, &games, &league.picks, &league.players)?,
                _ => bail!("Unsupported output format: {}", ext),
            }
            println!("Exported week {} ({} games) to {}", week, games.len(), output.display());
        }
        None => {
            if league.games.is_empty() {
                bail!("No games loaded yet; refresh at least one week first");
            }
            if ext != "xlsx" {
                bail!("Full-season export requires an .xlsx output");
            }
            xlsx::write_season_workbook(output, &league)?;
            println!(
                "Exported {} weeks plus season summary to {}",
                league.weeks().len(),
                output.display()
            );
        }
    }
    Ok(())
}

fn import(path: &Path, input: &Path, acting_id: &str) -> Result<()> {
    let mut league = League::load(path).context("Failed to read league file")?;

    let acting = league
        .player(acting_id)
        .with_context(|| format!("No player with id {:?} on the roster", acting_id))?;
    if !acting.is_admin() {
        bail!("Only an admin can import picks");
    }

    let import = xlsx::read_picks_workbook(input).context("Failed to read picks workbook")?;
    if import.is_empty() {
        bail!("No games were found in {}", input.display());
    }

    let players = league.players.clone();
    let count = import.apply(&mut league.picks, &players);
    league.save(path).context("Failed to write league file")?;

    println!(
        "Imported {} games across {} weeks",
        count,
        import.weeks_to_refresh.len()
    );
    if !import.weeks_to_refresh.is_empty() {
        let weeks: Vec<String> = import
            .weeks_to_refresh
            .iter()
            .map(|w| w.to_string())
            .collect();
        println!("Refresh these weeks to score the imported picks: {}", weeks.join(", "));
    }
    Ok(())
}

fn info(path: &Path) -> Result<()> {
    let league = League::load(path).context("Failed to read league file")?;

    println!("League file: {}", path.display());
    println!();

    println!("Players: {}", league.players.len());
    for player in &league.players {
        println!("  {} - {} ({})", player.id, player.display_name(), player.role);
    }
    println!();

    println!("Games: {}", league.games.len());
    for week in league.weeks() {
        let games = league.games_for_week(week);
        let completed = games.iter().filter(|g| g.completed).count();
        let picked = games
            .iter()
            .filter(|g| league.picks.game_has_picks(&g.id))
            .count();
        println!(
            "  Week {:<2} {} games, {} final, {} with picks",
            week,
            games.len(),
            completed,
            picked
        );
    }
    println!();

    println!("Games with recorded picks: {}", league.picks.games_with_picks());
    Ok(())
}
