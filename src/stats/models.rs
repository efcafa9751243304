use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for players table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Player {
    pub id: String, // Platform account id, e.g. "account.<hex>"
    pub name: String,
    pub is_forsen: bool,
    // Aggregates below are only written by the aggregate recomputation
    pub kills: i32,
    pub deaths: i32,
    pub games_sniped: i32,
    pub killscore: f64,
}

impl Player {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            is_forsen: false,
            kills: 0,
            deaths: 0,
            games_sniped: 0,
            killscore: 0.0,
        }
    }

    pub fn aggregates(&self) -> PlayerAggregates {
        PlayerAggregates {
            killscore: self.killscore,
            kills: self.kills,
            deaths: self.deaths,
            games_sniped: self.games_sniped,
        }
    }
}

/// Database model for matches table
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub duration: Option<i32>,
    pub created_at: Option<DateTime<Utc>>, // Set once API metadata was ingested
    pub map_name: Option<String>,
    pub nb_bots: Option<i32>,
    pub nb_real_players: Option<i32>,
    pub is_forsen_match: bool,
    pub forsen_died_to_account: Option<String>,
    pub forsen_died_to_cause: Option<String>,
    pub forsen_final_rank: Option<i32>,
    pub nb_forsen_kills: Option<i32>,
    pub nb_forsen_bot_kills: Option<i32>,
    #[serde(skip)]
    pub telemetry_data_gz: Option<Vec<u8>>, // Set once telemetry was replayed
}

impl Match {
    /// Bare row for a match id discovered in a player's history
    pub fn placeholder(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_fetched(&self) -> bool {
        self.created_at.is_some()
    }

    pub fn has_telemetry(&self) -> bool {
        self.telemetry_data_gz.is_some()
    }
}

/// Stats of one player during one match, unique on (player_id, match_id)
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub player_id: String,
    pub match_id: String,
    pub damage_dealt: Option<f64>,
    pub ride_distance: Option<f64>,
    pub walk_distance: Option<f64>,
    pub time_survived: Option<f64>,
    pub killed_forsen_with: Option<String>,
    pub killed_by_forsen_with: Option<String>,
    pub damage_to_forsen: Option<f64>,
    pub forsen_final_rank: Option<i32>, // Only set on the row of whoever killed forsen
    pub killscore: f64,
}

impl PlayerMatchStats {
    pub fn new(player_id: String, match_id: String) -> Self {
        Self {
            player_id,
            match_id,
            ..Self::default()
        }
    }
}

/// A player's stats row joined with the owning match's tracked flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatchHistoryEntry {
    pub stats: PlayerMatchStats,
    pub is_forsen_match: bool,
}

/// Cross-match totals cached on a player row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerAggregates {
    pub killscore: f64,
    pub kills: i32,
    pub deaths: i32,
    pub games_sniped: i32,
}

/// Leaderboard ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    #[default]
    Killscore,
    Kills,
    Deaths,
    GamesSniped,
}

impl LeaderboardSort {
    pub fn column(self) -> &'static str {
        match self {
            LeaderboardSort::Killscore => "killscore",
            LeaderboardSort::Kills => "kills",
            LeaderboardSort::Deaths => "deaths",
            LeaderboardSort::GamesSniped => "games_sniped",
        }
    }
}

/// Value of the refresh marker before the first completed refresh
pub fn default_last_update() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
