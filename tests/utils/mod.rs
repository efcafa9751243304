pub mod fixtures;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use fixtures::{
    damage_event, kill_event, match_document, participant, player_document, suicide_event,
    telemetry_log, FORSEN,
};
#[allow(unused_imports)]
pub use mocks::MockPubgApi;
pub use setup::TestSetup;
