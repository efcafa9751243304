use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    killscore::compute_killscore, repository::StatsRepository, PlayerAggregates,
    PlayerMatchHistoryEntry, StatsError,
};

/// Outcome of a kill-score recompute over every scored stats row
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KillscoreRecompute {
    pub rows_rescored: usize,
    pub players_recomputed: usize,
}

/// Folds a player's per-match history into cross-match totals
pub fn compute_aggregates(history: &[PlayerMatchHistoryEntry]) -> PlayerAggregates {
    let mut aggregates = PlayerAggregates::default();

    for entry in history {
        if entry.stats.killscore > 0.0 {
            aggregates.killscore += entry.stats.killscore;
            aggregates.kills += 1;
        }
        if entry.stats.killed_by_forsen_with.is_some() {
            aggregates.deaths += 1;
        }
        if entry.is_forsen_match {
            aggregates.games_sniped += 1;
        }
    }

    aggregates
}

/// Recomputes the aggregate columns cached on player rows
pub struct PlayerStatsService {
    repository: Arc<dyn StatsRepository>,
}

impl PlayerStatsService {
    pub fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self { repository }
    }

    /// Rebuilds one player's totals from their stats rows.
    ///
    /// Returns `None` without writing anything for the tracked player.
    #[instrument(skip(self))]
    pub async fn recompute_player(
        &self,
        player_id: &str,
    ) -> Result<Option<PlayerAggregates>, StatsError> {
        let player = self
            .repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("player {}", player_id)))?;

        if player.is_forsen {
            debug!(player_id = %player_id, "Skipping aggregates of tracked player");
            return Ok(None);
        }

        let history = self.repository.list_player_history(player_id).await?;
        let aggregates = compute_aggregates(&history);
        self.repository
            .save_player_aggregates(player_id, &aggregates)
            .await?;

        debug!(
            player_id = %player_id,
            killscore = aggregates.killscore,
            kills = aggregates.kills,
            deaths = aggregates.deaths,
            games_sniped = aggregates.games_sniped,
            "Player aggregates recomputed"
        );
        Ok(Some(aggregates))
    }

    /// Recomputes each listed player, logging and skipping individual failures.
    /// Returns how many players were written.
    #[instrument(skip(self, player_ids), fields(count = player_ids.len()))]
    pub async fn recompute_players(&self, player_ids: &[String]) -> usize {
        let mut recomputed = 0;

        for player_id in player_ids {
            match self.recompute_player(player_id).await {
                Ok(Some(_)) => recomputed += 1,
                Ok(None) => {}
                Err(e) => {
                    warn!(player_id = %player_id, error = %e, "Failed to recompute player aggregates");
                }
            }
        }

        info!(recomputed, "Player aggregates recomputed");
        recomputed
    }

    /// Aggregate-only batch job over every player
    #[instrument(skip(self))]
    pub async fn recompute_all_players(&self) -> Result<usize, StatsError> {
        let player_ids: Vec<String> = self
            .repository
            .list_players()
            .await?
            .into_iter()
            .map(|player| player.id)
            .collect();

        Ok(self.recompute_players(&player_ids).await)
    }

    /// Kill-score-only batch job: rescore every row that recorded a kill on
    /// forsen, then rebuild every player's totals
    #[instrument(skip(self))]
    pub async fn recompute_killscores(&self) -> Result<KillscoreRecompute, StatsError> {
        let scored = self.repository.list_scored_match_stats().await?;
        info!(rows = scored.len(), "Recomputing match kill scores");

        let mut rows_rescored = 0;
        for mut stats in scored {
            let (Some(cause), Some(rank)) = (&stats.killed_forsen_with, stats.forsen_final_rank)
            else {
                continue;
            };
            stats.killscore = compute_killscore(rank, cause);
            self.repository.save_player_match_stats(&stats).await?;
            rows_rescored += 1;
        }

        let players_recomputed = self.recompute_all_players().await?;
        Ok(KillscoreRecompute {
            rows_rescored,
            players_recomputed,
        })
    }
}
