pub mod decoder;
mod errors;
pub mod events;

pub use decoder::{compress, decode_events, decompress, is_gzip};
pub use errors::TelemetryError;
pub use events::{Character, DamageInfo, PlayerKill, PlayerTakeDamage, TelemetryEvent, VehicleRide};
