use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::{
        default_last_update, LeaderboardSort, Match, Player, PlayerAggregates,
        PlayerMatchHistoryEntry, PlayerMatchStats,
    },
    StatsError,
};

/// Storage operations needed by the ingestion pipeline, the recomputation
/// jobs and the read-only API
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn get_player(&self, player_id: &str) -> Result<Option<Player>, StatsError>;

    /// Returns the player, creating it with `name` if absent. The flag is
    /// true when the row was created by this call.
    async fn get_or_create_player(
        &self,
        player_id: &str,
        name: &str,
    ) -> Result<(Player, bool), StatsError>;
    async fn save_player(&self, player: &Player) -> Result<(), StatsError>;
    async fn list_players(&self) -> Result<Vec<Player>, StatsError>;

    /// Overwrites the four aggregate columns of a player in one write
    async fn save_player_aggregates(
        &self,
        player_id: &str,
        aggregates: &PlayerAggregates,
    ) -> Result<(), StatsError>;

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, StatsError>;
    async fn get_or_create_match(&self, match_id: &str) -> Result<(Match, bool), StatsError>;
    async fn save_match(&self, record: &Match) -> Result<(), StatsError>;

    /// Matches whose API metadata has never been ingested
    async fn list_unfetched_matches(&self) -> Result<Vec<Match>, StatsError>;

    async fn get_or_create_player_match_stats(
        &self,
        player_id: &str,
        match_id: &str,
    ) -> Result<(PlayerMatchStats, bool), StatsError>;
    async fn save_player_match_stats(&self, stats: &PlayerMatchStats) -> Result<(), StatsError>;
    async fn list_match_stats(&self, match_id: &str) -> Result<Vec<PlayerMatchStats>, StatsError>;
    async fn list_player_history(
        &self,
        player_id: &str,
    ) -> Result<Vec<PlayerMatchHistoryEntry>, StatsError>;

    /// Stats rows carrying both a killer cause and forsen's final rank
    async fn list_scored_match_stats(&self) -> Result<Vec<PlayerMatchStats>, StatsError>;

    /// Distinct ids of players having a stats row in any of the matches
    async fn player_ids_for_matches(&self, match_ids: &[String])
        -> Result<Vec<String>, StatsError>;

    async fn get_last_update(&self) -> Result<DateTime<Utc>, StatsError>;
    async fn set_last_update(&self, at: DateTime<Utc>) -> Result<(), StatsError>;

    /// Non-tracked players ordered by `sort`, highest first
    async fn leaderboard(
        &self,
        sort: LeaderboardSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Player>, StatsError>;
    async fn search_players(&self, query: &str, limit: i64) -> Result<Vec<Player>, StatsError>;
}

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<String, Player>,
    matches: HashMap<String, Match>,
    match_stats: HashMap<(String, String), PlayerMatchStats>,
    last_update: Option<DateTime<Utc>>,
}

/// In-memory implementation of StatsRepository for development and testing
///
/// List operations return rows in a stable order (by id) so callers see the
/// same sequence on every run.
#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    tables: RwLock<Tables>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a player row, flags included
    pub async fn insert_player(&self, player: Player) {
        let mut tables = self.tables.write().await;
        tables.players.insert(player.id.clone(), player);
    }

    pub async fn match_stats_count(&self) -> usize {
        self.tables.read().await.match_stats.len()
    }
}

fn stats_key(player_id: &str, match_id: &str) -> (String, String) {
    (player_id.to_string(), match_id.to_string())
}

fn sort_value(player: &Player, sort: LeaderboardSort) -> f64 {
    match sort {
        LeaderboardSort::Killscore => player.killscore,
        LeaderboardSort::Kills => f64::from(player.kills),
        LeaderboardSort::Deaths => f64::from(player.deaths),
        LeaderboardSort::GamesSniped => f64::from(player.games_sniped),
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn get_player(&self, player_id: &str) -> Result<Option<Player>, StatsError> {
        Ok(self.tables.read().await.players.get(player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_or_create_player(
        &self,
        player_id: &str,
        name: &str,
    ) -> Result<(Player, bool), StatsError> {
        let mut tables = self.tables.write().await;
        if let Some(player) = tables.players.get(player_id) {
            return Ok((player.clone(), false));
        }

        debug!(player_id = %player_id, "Creating player in memory");
        let player = Player::new(player_id.to_string(), name.to_string());
        tables.players.insert(player.id.clone(), player.clone());
        Ok((player, true))
    }

    async fn save_player(&self, player: &Player) -> Result<(), StatsError> {
        let mut tables = self.tables.write().await;
        tables.players.insert(player.id.clone(), player.clone());
        Ok(())
    }

    async fn list_players(&self) -> Result<Vec<Player>, StatsError> {
        let tables = self.tables.read().await;
        let mut players: Vec<Player> = tables.players.values().cloned().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(players)
    }

    async fn save_player_aggregates(
        &self,
        player_id: &str,
        aggregates: &PlayerAggregates,
    ) -> Result<(), StatsError> {
        let mut tables = self.tables.write().await;
        let player = tables
            .players
            .get_mut(player_id)
            .ok_or_else(|| StatsError::NotFound(format!("player {}", player_id)))?;

        player.killscore = aggregates.killscore;
        player.kills = aggregates.kills;
        player.deaths = aggregates.deaths;
        player.games_sniped = aggregates.games_sniped;
        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, StatsError> {
        Ok(self.tables.read().await.matches.get(match_id).cloned())
    }

    async fn get_or_create_match(&self, match_id: &str) -> Result<(Match, bool), StatsError> {
        let mut tables = self.tables.write().await;
        if let Some(record) = tables.matches.get(match_id) {
            return Ok((record.clone(), false));
        }

        let record = Match::placeholder(match_id.to_string());
        tables.matches.insert(record.id.clone(), record.clone());
        Ok((record, true))
    }

    async fn save_match(&self, record: &Match) -> Result<(), StatsError> {
        let mut tables = self.tables.write().await;
        tables.matches.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn list_unfetched_matches(&self) -> Result<Vec<Match>, StatsError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Match> = tables
            .matches
            .values()
            .filter(|record| !record.is_fetched())
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn get_or_create_player_match_stats(
        &self,
        player_id: &str,
        match_id: &str,
    ) -> Result<(PlayerMatchStats, bool), StatsError> {
        let mut tables = self.tables.write().await;
        let key = stats_key(player_id, match_id);
        if let Some(stats) = tables.match_stats.get(&key) {
            return Ok((stats.clone(), false));
        }

        let stats = PlayerMatchStats::new(player_id.to_string(), match_id.to_string());
        tables.match_stats.insert(key, stats.clone());
        Ok((stats, true))
    }

    async fn save_player_match_stats(&self, stats: &PlayerMatchStats) -> Result<(), StatsError> {
        let mut tables = self.tables.write().await;
        tables
            .match_stats
            .insert(stats_key(&stats.player_id, &stats.match_id), stats.clone());
        Ok(())
    }

    async fn list_match_stats(&self, match_id: &str) -> Result<Vec<PlayerMatchStats>, StatsError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<PlayerMatchStats> = tables
            .match_stats
            .values()
            .filter(|stats| stats.match_id == match_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        Ok(rows)
    }

    async fn list_player_history(
        &self,
        player_id: &str,
    ) -> Result<Vec<PlayerMatchHistoryEntry>, StatsError> {
        let tables = self.tables.read().await;
        let mut history: Vec<PlayerMatchHistoryEntry> = tables
            .match_stats
            .values()
            .filter(|stats| stats.player_id == player_id)
            .map(|stats| PlayerMatchHistoryEntry {
                stats: stats.clone(),
                is_forsen_match: tables
                    .matches
                    .get(&stats.match_id)
                    .map(|record| record.is_forsen_match)
                    .unwrap_or(false),
            })
            .collect();
        history.sort_by(|a, b| a.stats.match_id.cmp(&b.stats.match_id));
        Ok(history)
    }

    async fn list_scored_match_stats(&self) -> Result<Vec<PlayerMatchStats>, StatsError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<PlayerMatchStats> = tables
            .match_stats
            .values()
            .filter(|stats| stats.killed_forsen_with.is_some() && stats.forsen_final_rank.is_some())
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.match_id.as_str(), a.player_id.as_str())
                .cmp(&(b.match_id.as_str(), b.player_id.as_str()))
        });
        Ok(rows)
    }

    async fn player_ids_for_matches(
        &self,
        match_ids: &[String],
    ) -> Result<Vec<String>, StatsError> {
        let tables = self.tables.read().await;
        let ids: BTreeSet<String> = tables
            .match_stats
            .values()
            .filter(|stats| match_ids.contains(&stats.match_id))
            .map(|stats| stats.player_id.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn get_last_update(&self) -> Result<DateTime<Utc>, StatsError> {
        Ok(self
            .tables
            .read()
            .await
            .last_update
            .unwrap_or_else(default_last_update))
    }

    async fn set_last_update(&self, at: DateTime<Utc>) -> Result<(), StatsError> {
        self.tables.write().await.last_update = Some(at);
        Ok(())
    }

    async fn leaderboard(
        &self,
        sort: LeaderboardSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Player>, StatsError> {
        let tables = self.tables.read().await;
        let mut players: Vec<Player> = tables
            .players
            .values()
            .filter(|player| !player.is_forsen)
            .cloned()
            .collect();
        players.sort_by(|a, b| {
            sort_value(b, sort)
                .total_cmp(&sort_value(a, sort))
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(players
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn search_players(&self, query: &str, limit: i64) -> Result<Vec<Player>, StatsError> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        let mut players: Vec<Player> = tables
            .players
            .values()
            .filter(|player| player.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        players.sort_by(|a, b| {
            b.killscore
                .total_cmp(&a.killscore)
                .then_with(|| a.name.cmp(&b.name))
        });
        players.truncate(limit.max(0) as usize);
        Ok(players)
    }
}

/// PostgreSQL implementation of StatsRepository
///
/// Expects the schema in `migrations/`.
pub struct PostgresStatsRepository {
    pool: PgPool,
}

impl PostgresStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> StatsError {
    warn!(error = %e, "Database operation failed");
    StatsError::Repository(e.to_string())
}

/// Escapes LIKE wildcards so a search term matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<Player>, StatsError> {
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1")
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn get_or_create_player(
        &self,
        player_id: &str,
        name: &str,
    ) -> Result<(Player, bool), StatsError> {
        let inserted = sqlx::query(
            "INSERT INTO players (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(player_id)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(database_error)?
        .rows_affected()
            == 1;

        let player = self
            .get_player(player_id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("player {}", player_id)))?;

        if inserted {
            debug!(player_id = %player_id, "Player created in database");
        }
        Ok((player, inserted))
    }

    #[instrument(skip(self, player))]
    async fn save_player(&self, player: &Player) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO players (id, name, is_forsen, kills, deaths, games_sniped, killscore) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, is_forsen = EXCLUDED.is_forsen, \
             kills = EXCLUDED.kills, deaths = EXCLUDED.deaths, \
             games_sniped = EXCLUDED.games_sniped, killscore = EXCLUDED.killscore",
        )
        .bind(&player.id)
        .bind(&player.name)
        .bind(player.is_forsen)
        .bind(player.kills)
        .bind(player.deaths)
        .bind(player.games_sniped)
        .bind(player.killscore)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    async fn list_players(&self) -> Result<Vec<Player>, StatsError> {
        sqlx::query_as::<_, Player>("SELECT * FROM players ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)
    }

    #[instrument(skip(self, aggregates))]
    async fn save_player_aggregates(
        &self,
        player_id: &str,
        aggregates: &PlayerAggregates,
    ) -> Result<(), StatsError> {
        let result = sqlx::query(
            "UPDATE players SET killscore = $2, kills = $3, deaths = $4, games_sniped = $5 \
             WHERE id = $1",
        )
        .bind(player_id)
        .bind(aggregates.killscore)
        .bind(aggregates.kills)
        .bind(aggregates.deaths)
        .bind(aggregates.games_sniped)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(StatsError::NotFound(format!("player {}", player_id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, StatsError> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn get_or_create_match(&self, match_id: &str) -> Result<(Match, bool), StatsError> {
        let inserted =
            sqlx::query("INSERT INTO matches (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
                .bind(match_id)
                .execute(&self.pool)
                .await
                .map_err(database_error)?
                .rows_affected()
                == 1;

        let record = self
            .get_match(match_id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("match {}", match_id)))?;
        Ok((record, inserted))
    }

    #[instrument(skip(self, record), fields(match_id = %record.id))]
    async fn save_match(&self, record: &Match) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO matches (id, duration, created_at, map_name, nb_bots, nb_real_players, \
             is_forsen_match, forsen_died_to_account, forsen_died_to_cause, forsen_final_rank, \
             nb_forsen_kills, nb_forsen_bot_kills, telemetry_data_gz) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (id) DO UPDATE SET duration = EXCLUDED.duration, \
             created_at = EXCLUDED.created_at, map_name = EXCLUDED.map_name, \
             nb_bots = EXCLUDED.nb_bots, nb_real_players = EXCLUDED.nb_real_players, \
             is_forsen_match = EXCLUDED.is_forsen_match, \
             forsen_died_to_account = EXCLUDED.forsen_died_to_account, \
             forsen_died_to_cause = EXCLUDED.forsen_died_to_cause, \
             forsen_final_rank = EXCLUDED.forsen_final_rank, \
             nb_forsen_kills = EXCLUDED.nb_forsen_kills, \
             nb_forsen_bot_kills = EXCLUDED.nb_forsen_bot_kills, \
             telemetry_data_gz = EXCLUDED.telemetry_data_gz",
        )
        .bind(&record.id)
        .bind(record.duration)
        .bind(record.created_at)
        .bind(&record.map_name)
        .bind(record.nb_bots)
        .bind(record.nb_real_players)
        .bind(record.is_forsen_match)
        .bind(&record.forsen_died_to_account)
        .bind(&record.forsen_died_to_cause)
        .bind(record.forsen_final_rank)
        .bind(record.nb_forsen_kills)
        .bind(record.nb_forsen_bot_kills)
        .bind(&record.telemetry_data_gz)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    async fn list_unfetched_matches(&self) -> Result<Vec<Match>, StatsError> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE created_at IS NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn get_or_create_player_match_stats(
        &self,
        player_id: &str,
        match_id: &str,
    ) -> Result<(PlayerMatchStats, bool), StatsError> {
        let inserted = sqlx::query(
            "INSERT INTO player_match_stats (player_id, match_id) VALUES ($1, $2) \
             ON CONFLICT (player_id, match_id) DO NOTHING",
        )
        .bind(player_id)
        .bind(match_id)
        .execute(&self.pool)
        .await
        .map_err(database_error)?
        .rows_affected()
            == 1;

        let stats = sqlx::query_as::<_, PlayerMatchStats>(
            "SELECT * FROM player_match_stats WHERE player_id = $1 AND match_id = $2",
        )
        .bind(player_id)
        .bind(match_id)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;
        Ok((stats, inserted))
    }

    #[instrument(skip(self, stats), fields(player_id = %stats.player_id, match_id = %stats.match_id))]
    async fn save_player_match_stats(&self, stats: &PlayerMatchStats) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO player_match_stats (player_id, match_id, damage_dealt, ride_distance, \
             walk_distance, time_survived, killed_forsen_with, killed_by_forsen_with, \
             damage_to_forsen, forsen_final_rank, killscore) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (player_id, match_id) DO UPDATE SET \
             damage_dealt = EXCLUDED.damage_dealt, ride_distance = EXCLUDED.ride_distance, \
             walk_distance = EXCLUDED.walk_distance, time_survived = EXCLUDED.time_survived, \
             killed_forsen_with = EXCLUDED.killed_forsen_with, \
             killed_by_forsen_with = EXCLUDED.killed_by_forsen_with, \
             damage_to_forsen = EXCLUDED.damage_to_forsen, \
             forsen_final_rank = EXCLUDED.forsen_final_rank, killscore = EXCLUDED.killscore",
        )
        .bind(&stats.player_id)
        .bind(&stats.match_id)
        .bind(stats.damage_dealt)
        .bind(stats.ride_distance)
        .bind(stats.walk_distance)
        .bind(stats.time_survived)
        .bind(&stats.killed_forsen_with)
        .bind(&stats.killed_by_forsen_with)
        .bind(stats.damage_to_forsen)
        .bind(stats.forsen_final_rank)
        .bind(stats.killscore)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    async fn list_match_stats(&self, match_id: &str) -> Result<Vec<PlayerMatchStats>, StatsError> {
        sqlx::query_as::<_, PlayerMatchStats>(
            "SELECT * FROM player_match_stats WHERE match_id = $1 ORDER BY player_id",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn list_player_history(
        &self,
        player_id: &str,
    ) -> Result<Vec<PlayerMatchHistoryEntry>, StatsError> {
        let rows = sqlx::query(
            "SELECT s.*, m.is_forsen_match FROM player_match_stats s \
             JOIN matches m ON m.id = s.match_id \
             WHERE s.player_id = $1 ORDER BY s.match_id",
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter()
            .map(|row| {
                Ok(PlayerMatchHistoryEntry {
                    stats: PlayerMatchStats::from_row(row)?,
                    is_forsen_match: row.try_get("is_forsen_match")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(database_error)
    }

    async fn list_scored_match_stats(&self) -> Result<Vec<PlayerMatchStats>, StatsError> {
        sqlx::query_as::<_, PlayerMatchStats>(
            "SELECT * FROM player_match_stats \
             WHERE killed_forsen_with IS NOT NULL AND forsen_final_rank IS NOT NULL \
             ORDER BY match_id, player_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn player_ids_for_matches(
        &self,
        match_ids: &[String],
    ) -> Result<Vec<String>, StatsError> {
        let rows = sqlx::query(
            "SELECT DISTINCT player_id FROM player_match_stats \
             WHERE match_id = ANY($1) ORDER BY player_id",
        )
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("player_id"))
            .collect())
    }

    async fn get_last_update(&self) -> Result<DateTime<Utc>, StatsError> {
        let row = sqlx::query("SELECT last_update FROM website WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(row
            .map(|row| row.get::<DateTime<Utc>, _>("last_update"))
            .unwrap_or_else(default_last_update))
    }

    async fn set_last_update(&self, at: DateTime<Utc>) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO website (id, last_update) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET last_update = EXCLUDED.last_update",
        )
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    async fn leaderboard(
        &self,
        sort: LeaderboardSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Player>, StatsError> {
        // Column names come from a closed enum
        let query = format!(
            "SELECT * FROM players WHERE NOT is_forsen ORDER BY {} DESC, name ASC \
             LIMIT $1 OFFSET $2",
            sort.column()
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn search_players(&self, query: &str, limit: i64) -> Result<Vec<Player>, StatsError> {
        sqlx::query_as::<_, Player>(
            "SELECT * FROM players WHERE name ILIKE $1 \
             ORDER BY killscore DESC, name ASC LIMIT $2",
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }
}
