use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{
    errors::ApiError,
    types::{MatchResponse, PlayerResponse},
};

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Remote game API used by the ingestion pipeline.
///
/// Implementations perform exactly one request per call; retry policy is left
/// to the caller.
#[async_trait]
pub trait PubgApi: Send + Sync {
    async fn get_player(&self, player_id: &str) -> Result<PlayerResponse, ApiError>;
    async fn get_match(&self, match_id: &str) -> Result<MatchResponse, ApiError>;
    async fn get_telemetry(&self, telemetry_url: &str) -> Result<Vec<u8>, ApiError>;
}

/// reqwest-backed client for a single PUBG shard
pub struct HttpPubgClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpPubgClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!(url = %url, "Issuing API request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, JSON_API_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "API request failed");
                ApiError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), url = %url, "API returned non-success status");
            return Err(ApiError::Remote {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, url = %url, "Failed to decode API payload");
            ApiError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl PubgApi for HttpPubgClient {
    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<PlayerResponse, ApiError> {
        let url = format!("{}players/{}", self.base_url, player_id);
        self.get_json(&url).await
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<MatchResponse, ApiError> {
        let url = format!("{}matches/{}", self.base_url, match_id);
        self.get_json(&url).await
    }

    #[instrument(skip(self))]
    async fn get_telemetry(&self, telemetry_url: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(telemetry_url).await
    }
}
