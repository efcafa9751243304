use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{Read, Write};
use tracing::{debug, warn};

use super::{errors::TelemetryError, events::TelemetryEvent};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Gzip-compresses a raw telemetry payload for storage
pub fn compress(data: &[u8]) -> Result<Vec<u8>, TelemetryError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, TelemetryError> {
    let mut decoder = GzDecoder::new(data);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(raw)
}

/// Whether the payload starts with the gzip magic bytes
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Parses a telemetry log into its ordered event sequence.
///
/// Accepts both the plain JSON array served by the API and the gzip blob
/// kept in storage. Entries that fail to decode are skipped individually so
/// one malformed event does not discard the rest of the log; order of the
/// remaining events is preserved.
pub fn decode_events(data: &[u8]) -> Result<Vec<TelemetryEvent>, TelemetryError> {
    let raw = if is_gzip(data) {
        decompress(data)?
    } else {
        data.to_vec()
    };

    let entries: Vec<serde_json::Value> = serde_json::from_slice(&raw)?;
    let mut events = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<TelemetryEvent>(entry) {
            Ok(event) => events.push(event),
            Err(e) => {
                skipped += 1;
                warn!(index, error = %e, "Skipping malformed telemetry event");
            }
        }
    }

    debug!(decoded = events.len(), skipped, "Telemetry log decoded");
    Ok(events)
}
