mod errors;
pub mod ingestion;
pub mod replay;

pub use errors::IngestError;
pub use ingestion::{IngestionReport, MatchIngestionService, TelemetryOutcome};
pub use replay::{ReplaySummary, TelemetryReplay};
