#![allow(dead_code)]

use std::sync::Arc;

use snipetracker::{
    matches::MatchIngestionService,
    refresh::{RefreshService, RetryPolicy},
    stats::{InMemoryStatsRepository, PlayerStatsService},
};

use super::{fixtures::FORSEN, mocks::MockPubgApi};

/// Services wired against the mock API and in-memory storage
pub struct TestSetup {
    pub api: MockPubgApi,
    pub repository: Arc<InMemoryStatsRepository>,
    pub ingestion: MatchIngestionService,
    pub player_stats: PlayerStatsService,
    pub refresh: RefreshService,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::no_retry())
    }

    pub fn with_retry(retry: RetryPolicy) -> Self {
        let api = MockPubgApi::new();
        let repository = Arc::new(InMemoryStatsRepository::new());

        Self {
            ingestion: MatchIngestionService::new(
                Arc::new(api.clone()),
                repository.clone(),
                FORSEN,
            ),
            player_stats: PlayerStatsService::new(repository.clone()),
            refresh: RefreshService::new(
                Arc::new(api.clone()),
                repository.clone(),
                FORSEN,
                retry,
            ),
            api,
            repository,
        }
    }
}
