use thiserror::Error;

use crate::pubg::ApiError;
use crate::stats::StatsError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl IngestError {
    /// Whether re-running the same ingestion may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            IngestError::Api(e) => e.is_transient(),
            IngestError::Stats(_) | IngestError::Telemetry(_) => false,
        }
    }
}
