#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use snipetracker::pubg::{ApiError, MatchResponse, PlayerResponse, PubgApi};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Scripted remote API. Documents are stored as JSON so they go through the
/// same deserialization as real responses.
#[derive(Clone, Default)]
pub struct MockPubgApi {
    players: Arc<RwLock<HashMap<String, Value>>>,
    matches: Arc<RwLock<HashMap<String, Value>>>,
    telemetry: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Errors returned, front first, before the scripted documents
    match_failures: Arc<RwLock<HashMap<String, Vec<ApiError>>>>,
    player_failure: Arc<RwLock<Option<u16>>>,
    calls: Arc<RwLock<HashMap<String, usize>>>,
}

impl MockPubgApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_player(&self, player_id: &str, document: Value) {
        self.players
            .write()
            .await
            .insert(player_id.to_string(), document);
    }

    pub async fn add_match(&self, match_id: &str, document: Value) {
        self.matches
            .write()
            .await
            .insert(match_id.to_string(), document);
    }

    pub async fn add_telemetry(&self, url: &str, body: Vec<u8>) {
        self.telemetry.write().await.insert(url.to_string(), body);
    }

    pub async fn fail_match_with(&self, match_id: &str, status: u16) {
        self.match_failures
            .write()
            .await
            .entry(match_id.to_string())
            .or_default()
            .push(ApiError::Remote {
                status,
                body: String::new(),
            });
    }

    pub async fn fail_player_with(&self, status: u16) {
        *self.player_failure.write().await = Some(status);
    }

    pub async fn calls_to(&self, key: &str) -> usize {
        self.calls.read().await.get(key).copied().unwrap_or(0)
    }

    async fn record_call(&self, key: String) {
        *self.calls.write().await.entry(key).or_default() += 1;
    }
}

fn not_found() -> ApiError {
    ApiError::Remote {
        status: 404,
        body: "{\"errors\":[{\"title\":\"Not Found\"}]}".to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(document: Value) -> Result<T, ApiError> {
    serde_json::from_value(document).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl PubgApi for MockPubgApi {
    async fn get_player(&self, player_id: &str) -> Result<PlayerResponse, ApiError> {
        self.record_call(format!("player:{}", player_id)).await;
        if let Some(status) = *self.player_failure.read().await {
            return Err(ApiError::Remote {
                status,
                body: String::new(),
            });
        }

        let document = self.players.read().await.get(player_id).cloned();
        decode(document.ok_or_else(not_found)?)
    }

    async fn get_match(&self, match_id: &str) -> Result<MatchResponse, ApiError> {
        self.record_call(format!("match:{}", match_id)).await;
        if let Some(failures) = self.match_failures.write().await.get_mut(match_id) {
            if !failures.is_empty() {
                return Err(failures.remove(0));
            }
        }

        let document = self.matches.read().await.get(match_id).cloned();
        decode(document.ok_or_else(not_found)?)
    }

    async fn get_telemetry(&self, telemetry_url: &str) -> Result<Vec<u8>, ApiError> {
        self.record_call(format!("telemetry:{}", telemetry_url))
            .await;
        self.telemetry
            .read()
            .await
            .get(telemetry_url)
            .cloned()
            .ok_or_else(not_found)
    }
}
