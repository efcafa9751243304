use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
