use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Pick-mutation permission level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Player,
}

impl Role {
    pub fn from_str(s: &str) -> Role {
        match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            _ => Role::Player,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Player => write!(f, "player"),
        }
    }
}

/// A participant who makes picks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity, tied to the auth account when one exists
    pub id: String,
    pub name: String,
    /// Optional display override
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub initials: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub role: Role,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        let name = name.into();
        let initials = name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "P".to_string());
        Player {
            id: id.into(),
            name,
            initials,
            role,
            ..Default::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Nickname when set, otherwise the base name
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.name
        } else {
            &self.nickname
        }
    }
}

/// One row of a roster CSV: id,name,nickname,role,initials,color
#[derive(Debug, Clone, Deserialize)]
struct RosterRow {
    id: String,
    name: String,
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    initials: String,
    #[serde(default)]
    color: String,
}

/// Load a player roster from a CSV file.
///
/// Rows with an empty id are skipped. Unknown role strings fall back to
/// `player`. The file's row order becomes the roster order, which the
/// standings tie-break treats as a contract.
pub fn load_roster(path: &Path) -> Result<Vec<Player>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut players = Vec::new();

    for record in reader.deserialize() {
        let row: RosterRow = record?;
        if row.id.trim().is_empty() {
            log::warn!("skipping roster row with empty id (name: {:?})", row.name);
            continue;
        }

        let mut player = Player::new(row.id.trim(), row.name.trim(), Role::from_str(&row.role));
        player.nickname = row.nickname.trim().to_string();
        if !row.initials.trim().is_empty() {
            player.initials = row.initials.trim().to_string();
        }
        player.color = row.color.trim().to_string();
        players.push(player);
    }

    Ok(players)
}
