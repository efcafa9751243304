// Public API - what other modules can use
pub use account::AccountKind;
pub use client::{HttpPubgClient, PubgApi};
pub use errors::ApiError;
pub use types::{
    AssetAttributes, IncludedResource, MatchAttributes, MatchData, MatchResponse,
    ParticipantAttributes, ParticipantStats, PlayerAttributes, PlayerData, PlayerResponse,
    ResourceIdentifier,
};

mod account;
pub mod client;
mod errors;
pub mod types;
