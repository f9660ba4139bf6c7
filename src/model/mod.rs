mod game;
mod player;
mod standings;

pub use game::{merge_all, Game, TeamSide};
pub use player::{load_roster, Player, Role};
pub use standings::{
    compute_standings, season_detail, PickRecord, PickResult, SeasonDetail, SeasonStats,
    StandingRow,
};
