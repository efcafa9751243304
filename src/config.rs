use std::time::Duration;

use crate::refresh::RetryPolicy;

const DEFAULT_API_URL: &str = "https://api.pubg.com/shards/steam/";
const DEFAULT_TRACKED_PLAYER_ID: &str = "account.9f8afe4c244e4290abb265d6864eac3e";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub api_url: String,
    pub tracked_player_id: String,
    /// In-memory storage is used when unset
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Numbers that do not parse into
    /// their target type fall back to defaults; periods must be non-zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| -> Option<u64> {
            lookup(key).and_then(|value| value.trim().parse().ok())
        };
        let period_secs = |key: &str, default: u64| -> u64 {
            number(key).filter(|secs| *secs > 0).unwrap_or(default)
        };

        let max_attempts = number("REFRESH_MAX_ATTEMPTS")
            .and_then(|attempts| u32::try_from(attempts).ok())
            .unwrap_or(3);
        let retry = RetryPolicy::new(
            max_attempts,
            Duration::from_millis(number("REFRESH_RETRY_DELAY_MS").unwrap_or(2000)),
        );

        Self {
            api_key: lookup("PUBG_API_KEY").unwrap_or_default(),
            api_url: lookup("PUBG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            tracked_player_id: lookup("TRACKED_PLAYER_ID")
                .unwrap_or_else(|| DEFAULT_TRACKED_PLAYER_ID.to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            refresh_interval: Duration::from_secs(period_secs("REFRESH_INTERVAL_SECS", 3600)),
            http_timeout: Duration::from_secs(period_secs("HTTP_TIMEOUT_SECS", 30)),
            retry,
        }
    }
}
