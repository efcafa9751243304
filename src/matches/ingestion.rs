use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    errors::IngestError,
    replay::{ReplaySummary, TelemetryReplay},
};
use crate::pubg::{AccountKind, IncludedResource, MatchResponse, ParticipantStats, PubgApi};
use crate::stats::{Match, StatsError, StatsRepository};
use crate::telemetry::{compress, decode_events, is_gzip, TelemetryEvent};

/// Name of the asset carrying the telemetry URL in a match document
const TELEMETRY_ASSET_NAME: &str = "telemetry";

/// What happened to the telemetry half of an ingestion
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryOutcome {
    Replayed(ReplaySummary),
    /// The match document had no telemetry asset
    Unavailable,
    /// Fetching or decoding failed; the blob stays empty for a later retry
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub match_id: String,
    pub real_players: i32,
    pub bots: i32,
    pub is_forsen_match: bool,
    pub telemetry: TelemetryOutcome,
}

/// Pulls one match from the API into storage: metadata and participants
/// first, then the telemetry replay.
pub struct MatchIngestionService {
    api: Arc<dyn PubgApi>,
    repository: Arc<dyn StatsRepository>,
    tracked_player_id: String,
}

#[derive(Debug, Default)]
struct ParticipantCounts {
    real_players: i32,
    bots: i32,
    tracked_present: bool,
}

fn telemetry_url(response: &MatchResponse) -> Option<&str> {
    response.included.iter().find_map(|resource| match resource {
        IncludedResource::Asset { attributes } if attributes.name == TELEMETRY_ASSET_NAME => {
            Some(attributes.url.as_str())
        }
        _ => None,
    })
}

impl MatchIngestionService {
    pub fn new(
        api: Arc<dyn PubgApi>,
        repository: Arc<dyn StatsRepository>,
        tracked_player_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            repository,
            tracked_player_id: tracked_player_id.into(),
        }
    }

    /// Ingests a match end to end.
    ///
    /// Metadata, participants and their raw metrics are always written when
    /// the match document could be fetched. A telemetry failure is logged and
    /// reported but does not fail the ingestion.
    #[instrument(skip(self))]
    pub async fn ingest_match(&self, match_id: &str) -> Result<IngestionReport, IngestError> {
        let response = self.api.get_match(match_id).await?;
        let (mut record, _) = self.repository.get_or_create_match(match_id).await?;

        let attributes = &response.data.attributes;
        record.created_at = Some(attributes.created_at);
        record.map_name = Some(attributes.map_name.clone());
        record.duration = attributes.duration;

        let mut counts = ParticipantCounts::default();
        for resource in &response.included {
            match resource {
                IncludedResource::Participant { attributes } => {
                    self.ingest_participant(match_id, &attributes.stats, &mut counts)
                        .await?;
                }
                IncludedResource::Asset { .. } | IncludedResource::Roster => {}
                IncludedResource::Unknown => {
                    warn!(match_id = %match_id, "Unhandled included resource type");
                }
            }
        }

        record.nb_bots = Some(counts.bots);
        record.nb_real_players = Some(counts.real_players);
        record.is_forsen_match = counts.tracked_present;

        debug!(
            match_id = %match_id,
            real_players = counts.real_players,
            bots = counts.bots,
            is_forsen_match = counts.tracked_present,
            "Match metadata ingested"
        );

        let loaded = self.load_telemetry(&record, telemetry_url(&response)).await;
        let telemetry = match loaded {
            Some((events, fresh_blob)) => {
                let summary = self.replay(&mut record, &events).await?;
                if fresh_blob.is_some() {
                    record.telemetry_data_gz = fresh_blob;
                }
                TelemetryOutcome::Replayed(summary)
            }
            None if record.has_telemetry() || telemetry_url(&response).is_some() => {
                TelemetryOutcome::Failed
            }
            None => {
                info!(match_id = %match_id, "Match has no telemetry asset");
                TelemetryOutcome::Unavailable
            }
        };

        self.repository.save_match(&record).await?;

        info!(
            match_id = %match_id,
            map_name = record.map_name.as_deref().unwrap_or_default(),
            telemetry = ?telemetry,
            "Match ingested"
        );
        Ok(IngestionReport {
            match_id: match_id.to_string(),
            real_players: counts.real_players,
            bots: counts.bots,
            is_forsen_match: counts.tracked_present,
            telemetry,
        })
    }

    /// Replays the stored telemetry blob of an already ingested match without
    /// contacting the API. Returns `None` when no blob is stored.
    #[instrument(skip(self))]
    pub async fn replay_cached_telemetry(
        &self,
        match_id: &str,
    ) -> Result<Option<ReplaySummary>, IngestError> {
        let mut record = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("match {}", match_id)))?;

        let Some(blob) = record.telemetry_data_gz.as_deref() else {
            info!(match_id = %match_id, "No stored telemetry to replay");
            return Ok(None);
        };
        let events = decode_events(blob)?;

        let summary = self.replay(&mut record, &events).await?;
        self.repository.save_match(&record).await?;
        Ok(Some(summary))
    }

    async fn ingest_participant(
        &self,
        match_id: &str,
        stats: &ParticipantStats,
        counts: &mut ParticipantCounts,
    ) -> Result<(), StatsError> {
        match AccountKind::classify(&stats.player_id) {
            AccountKind::Bot => {
                counts.bots += 1;
                return Ok(());
            }
            AccountKind::Npc => return Ok(()),
            AccountKind::Player => counts.real_players += 1,
        }

        let is_tracked = stats.player_id == self.tracked_player_id;
        let (mut player, _) = self
            .repository
            .get_or_create_player(&stats.player_id, &stats.name)
            .await?;
        if is_tracked {
            counts.tracked_present = true;
            if !player.is_forsen {
                player.is_forsen = true;
                self.repository.save_player(&player).await?;
            }
        }

        let (mut row, _) = self
            .repository
            .get_or_create_player_match_stats(&stats.player_id, match_id)
            .await?;
        row.damage_dealt = Some(stats.damage_dealt);
        row.ride_distance = Some(stats.ride_distance);
        row.walk_distance = Some(stats.walk_distance);
        row.time_survived = Some(stats.time_survived);
        self.repository.save_player_match_stats(&row).await
    }

    /// Decoded events plus, when freshly downloaded, the blob to store.
    /// `None` when there is nothing usable to replay.
    async fn load_telemetry(
        &self,
        record: &Match,
        url: Option<&str>,
    ) -> Option<(Vec<TelemetryEvent>, Option<Vec<u8>>)> {
        if let Some(blob) = record.telemetry_data_gz.as_deref() {
            return match decode_events(blob) {
                Ok(events) => Some((events, None)),
                Err(e) => {
                    warn!(match_id = %record.id, error = %e, "Stored telemetry could not be decoded");
                    None
                }
            };
        }

        let url = url?;
        let raw = match self.api.get_telemetry(url).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(match_id = %record.id, error = %e, "Telemetry download failed");
                return None;
            }
        };

        let events = match decode_events(&raw) {
            Ok(events) => events,
            Err(e) => {
                warn!(match_id = %record.id, error = %e, "Telemetry could not be decoded");
                return None;
            }
        };

        if is_gzip(&raw) {
            return Some((events, Some(raw)));
        }
        match compress(&raw) {
            Ok(blob) => Some((events, Some(blob))),
            Err(e) => {
                warn!(match_id = %record.id, error = %e, "Telemetry could not be compressed");
                None
            }
        }
    }

    async fn replay(
        &self,
        record: &mut Match,
        events: &[TelemetryEvent],
    ) -> Result<ReplaySummary, StatsError> {
        let rows = self.repository.list_match_stats(&record.id).await?;

        let mut replay = TelemetryReplay::new(&self.tracked_player_id, record, rows);
        let summary = replay.run(events);
        for row in replay.into_rows() {
            self.repository.save_player_match_stats(&row).await?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubg::{ApiError, PlayerResponse};
    use crate::stats::InMemoryStatsRepository;
    use async_trait::async_trait;
    use serde_json::json;

    const FORSEN: &str = "account.forsen";

    struct StaticApi {
        document: serde_json::Value,
        telemetry: Option<Vec<u8>>,
    }

    #[async_trait]
    impl PubgApi for StaticApi {
        async fn get_player(&self, _player_id: &str) -> Result<PlayerResponse, ApiError> {
            Err(ApiError::Decode("not used".into()))
        }

        async fn get_match(&self, _match_id: &str) -> Result<MatchResponse, ApiError> {
            serde_json::from_value(self.document.clone()).map_err(|e| ApiError::Decode(e.to_string()))
        }

        async fn get_telemetry(&self, _telemetry_url: &str) -> Result<Vec<u8>, ApiError> {
            self.telemetry.clone().ok_or(ApiError::Remote {
                status: 404,
                body: String::new(),
            })
        }
    }

    fn participant(player_id: &str) -> serde_json::Value {
        json!({
            "type": "participant",
            "attributes": { "stats": { "playerId": player_id, "name": player_id, "damageDealt": 12.0 } }
        })
    }

    fn document(with_asset: bool) -> serde_json::Value {
        let mut included = vec![
            participant(FORSEN),
            participant("account.a"),
            participant("ai.1"),
            participant("npc.1"),
        ];
        if with_asset {
            included.push(json!({
                "type": "asset",
                "attributes": { "name": "telemetry", "URL": "https://telemetry/m1.json" }
            }));
        }
        json!({
            "data": {
                "id": "m1",
                "attributes": { "createdAt": "2023-04-01T18:30:00Z", "mapName": "Erangel_Main" }
            },
            "included": included
        })
    }

    fn service(api: StaticApi) -> (MatchIngestionService, Arc<InMemoryStatsRepository>) {
        let repo = Arc::new(InMemoryStatsRepository::new());
        (
            MatchIngestionService::new(Arc::new(api), repo.clone(), FORSEN),
            repo,
        )
    }

    #[tokio::test]
    async fn counts_participants_and_skips_bots_and_npcs() {
        let (service, repo) = service(StaticApi {
            document: document(false),
            telemetry: None,
        });

        let report = service.ingest_match("m1").await.unwrap();
        assert_eq!(report.real_players, 2);
        assert_eq!(report.bots, 1);
        assert!(report.is_forsen_match);
        assert_eq!(report.telemetry, TelemetryOutcome::Unavailable);

        let record = repo.get_match("m1").await.unwrap().unwrap();
        assert!(record.is_fetched());
        assert_eq!(record.nb_bots, Some(1));
        assert_eq!(record.nb_real_players, Some(2));
        assert!(!record.has_telemetry());
        assert_eq!(repo.match_stats_count().await, 2);
        assert!(repo.get_player("ai.1").await.unwrap().is_none());
        assert!(repo.get_player(FORSEN).await.unwrap().unwrap().is_forsen);
    }

    #[tokio::test]
    async fn undecodable_telemetry_leaves_blob_empty() {
        let (service, repo) = service(StaticApi {
            document: document(true),
            telemetry: Some(b"<html>gateway timeout</html>".to_vec()),
        });

        let report = service.ingest_match("m1").await.unwrap();
        assert_eq!(report.telemetry, TelemetryOutcome::Failed);

        let record = repo.get_match("m1").await.unwrap().unwrap();
        assert!(record.is_fetched());
        assert!(!record.has_telemetry());
    }

    #[tokio::test]
    async fn replay_from_cache_requires_stored_blob() {
        let (service, repo) = service(StaticApi {
            document: document(false),
            telemetry: None,
        });
        service.ingest_match("m1").await.unwrap();
        assert_eq!(service.replay_cached_telemetry("m1").await.unwrap(), None);

        let missing = service.replay_cached_telemetry("m404").await;
        assert!(matches!(missing, Err(IngestError::Stats(StatsError::NotFound(_)))));
        assert!(repo.get_match("m404").await.unwrap().is_none());
    }
}
