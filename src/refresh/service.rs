use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::retry::RetryPolicy;
use crate::matches::{IngestError, MatchIngestionService};
use crate::pubg::PubgApi;
use crate::stats::{PlayerStatsService, StatsError, StatsRepository};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    /// Match ids first seen in the tracked player's history this run
    pub discovered_matches: usize,
    pub ingested_matches: Vec<String>,
    pub failed_matches: Vec<String>,
    pub players_recomputed: usize,
    pub completed_at: DateTime<Utc>,
}

/// Drives one refresh: sync the tracked player, ingest every pending match,
/// recompute the players involved and stamp the refresh marker.
pub struct RefreshService {
    api: Arc<dyn PubgApi>,
    repository: Arc<dyn StatsRepository>,
    ingestion: MatchIngestionService,
    player_stats: PlayerStatsService,
    tracked_player_id: String,
    retry: RetryPolicy,
}

impl RefreshService {
    pub fn new(
        api: Arc<dyn PubgApi>,
        repository: Arc<dyn StatsRepository>,
        tracked_player_id: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        let tracked_player_id = tracked_player_id.into();
        Self {
            ingestion: MatchIngestionService::new(
                api.clone(),
                repository.clone(),
                tracked_player_id.clone(),
            ),
            player_stats: PlayerStatsService::new(repository.clone()),
            api,
            repository,
            tracked_player_id,
            retry,
        }
    }

    pub fn ingestion(&self) -> &MatchIngestionService {
        &self.ingestion
    }

    pub fn player_stats(&self) -> &PlayerStatsService {
        &self.player_stats
    }

    /// Updates the tracked player's name and registers every match of their
    /// history as a placeholder, together with the player's stats row.
    /// Returns how many matches were new.
    #[instrument(skip(self))]
    pub async fn sync_tracked_player(&self) -> Result<usize, IngestError> {
        let api = self.api.as_ref();
        let player_id = self.tracked_player_id.as_str();
        let response = self
            .retry
            .run("fetch tracked player", move || api.get_player(player_id))
            .await?;
        let data = response.data;

        let (mut player, _) = self
            .repository
            .get_or_create_player(player_id, &data.attributes.name)
            .await?;
        player.name = data.attributes.name.clone();
        player.is_forsen = true;
        self.repository.save_player(&player).await?;

        let mut discovered = 0;
        for match_id in data.match_ids() {
            let (_, created) = self.repository.get_or_create_match(match_id).await?;
            if created {
                discovered += 1;
            }
            self.repository
                .get_or_create_player_match_stats(player_id, match_id)
                .await?;
        }

        info!(player_id = %player_id, discovered, "Tracked player synchronised");
        Ok(discovered)
    }

    /// One full refresh.
    ///
    /// A failed player sync or match ingestion is logged and the run
    /// continues; only storage failures outside a single match abort it.
    #[instrument(skip(self))]
    pub async fn run_refresh(&self) -> Result<RefreshReport, StatsError> {
        info!("Starting refresh");

        let discovered_matches = match self.sync_tracked_player().await {
            Ok(discovered) => discovered,
            Err(e) => {
                warn!(error = %e, "Tracked player sync failed, ingesting known matches only");
                0
            }
        };

        let pending = self.repository.list_unfetched_matches().await?;
        info!(pending = pending.len(), "Ingesting pending matches");

        let ingestion = &self.ingestion;
        let mut ingested_matches = Vec::new();
        let mut failed_matches = Vec::new();
        for record in pending {
            let match_id = record.id.as_str();
            match self
                .retry
                .run("ingest match", move || ingestion.ingest_match(match_id))
                .await
            {
                Ok(report) => ingested_matches.push(report.match_id),
                Err(e) => {
                    warn!(match_id = %match_id, error = %e, "Match ingestion failed");
                    failed_matches.push(record.id.clone());
                }
            }
        }

        let player_ids = if ingested_matches.is_empty() {
            Vec::new()
        } else {
            self.repository
                .player_ids_for_matches(&ingested_matches)
                .await?
        };
        let players_recomputed = self.player_stats.recompute_players(&player_ids).await;

        let completed_at = Utc::now();
        self.repository.set_last_update(completed_at).await?;

        info!(
            discovered = discovered_matches,
            ingested = ingested_matches.len(),
            failed = failed_matches.len(),
            players_recomputed,
            "Refresh completed"
        );
        Ok(RefreshReport {
            discovered_matches,
            ingested_matches,
            failed_matches,
            players_recomputed,
            completed_at,
        })
    }
}
