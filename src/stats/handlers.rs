use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{LeaderboardSort, Match, Player, PlayerMatchHistoryEntry, PlayerMatchStats};
use crate::shared::{AppError, AppState};

pub const LEADERBOARD_PAGE_SIZE: i64 = 25;
const SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub sort: LeaderboardSort,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetailResponse {
    pub player: Player,
    pub history: Vec<PlayerMatchHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct MatchDetailResponse {
    #[serde(flatten)]
    pub record: Match,
    pub participants: Vec<PlayerMatchStats>,
}

/// Read-only routes over the persisted stats
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/players", get(leaderboard))
        .route("/players/search", get(search_players))
        .route("/players/:player_id", get(player_detail))
        .route("/matches/:match_id", get(match_detail))
}

/// GET /status
#[instrument(name = "status", skip(state))]
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let last_update = state.repository.get_last_update().await?;
    Ok(Json(StatusResponse { last_update }))
}

/// GET /players?sort=kills&page=2
///
/// Pages start at 1.
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<Player>>, AppError> {
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::BadRequest("page starts at 1".to_string()));
    }
    let offset = (page - 1)
        .checked_mul(LEADERBOARD_PAGE_SIZE)
        .ok_or_else(|| AppError::BadRequest(format!("page {} is out of range", page)))?;

    let players = state
        .repository
        .leaderboard(query.sort, LEADERBOARD_PAGE_SIZE, offset)
        .await?;

    info!(page, count = players.len(), "Leaderboard page served");
    Ok(Json(players))
}

/// GET /players/search?q=name
#[instrument(name = "search_players", skip(state))]
pub async fn search_players(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Player>>, AppError> {
    let needle = query.q.trim();
    if needle.is_empty() {
        return Err(AppError::BadRequest("empty search".to_string()));
    }

    let players = state.repository.search_players(needle, SEARCH_LIMIT).await?;
    Ok(Json(players))
}

/// GET /players/:player_id
#[instrument(name = "player_detail", skip(state))]
pub async fn player_detail(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerDetailResponse>, AppError> {
    let player = state
        .repository
        .get_player(&player_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("player {}", player_id)))?;
    let history = state.repository.list_player_history(&player_id).await?;

    Ok(Json(PlayerDetailResponse { player, history }))
}

/// GET /matches/:match_id
#[instrument(name = "match_detail", skip(state))]
pub async fn match_detail(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchDetailResponse>, AppError> {
    let record = state
        .repository
        .get_match(&match_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("match {}", match_id)))?;
    let participants = state.repository.list_match_stats(&match_id).await?;

    Ok(Json(MatchDetailResponse {
        record,
        participants,
    }))
}
