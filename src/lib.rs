// Library crate for the forsen snipe tracker
// This file exposes the public API for integration tests

pub mod config;
pub mod matches;
pub mod pubg;
pub mod refresh;
pub mod shared;
pub mod stats;
pub mod telemetry;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use matches::{IngestError, MatchIngestionService};
pub use pubg::{HttpPubgClient, PubgApi};
pub use refresh::{RefreshService, RetryPolicy};
pub use shared::{AppError, AppState};
pub use stats::{InMemoryStatsRepository, PlayerStatsService, StatsRepository};
