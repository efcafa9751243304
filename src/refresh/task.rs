use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, instrument};

use super::service::RefreshService;

/// Starts the background task that refreshes the tracked player's matches on
/// a fixed schedule. The first refresh runs immediately.
#[instrument(skip(service))]
pub async fn start_refresh_task(service: Arc<RefreshService>, refresh_interval: Duration) {
    info!(
        refresh_interval_secs = refresh_interval.as_secs(),
        "Starting refresh background task"
    );

    let mut refresh_interval = interval(refresh_interval);
    // A refresh longer than the period must not trigger a burst afterwards
    refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        refresh_interval.tick().await;

        match service.run_refresh().await {
            Ok(report) => {
                info!(
                    ingested = report.ingested_matches.len(),
                    failed = report.failed_matches.len(),
                    "Scheduled refresh completed"
                );
            }
            Err(e) => {
                error!(error = %e, "Scheduled refresh failed");
            }
        }
    }
}
