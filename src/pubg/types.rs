//! JSON:API payloads returned by the PUBG shard endpoints.
//!
//! Only the fields the ingestion pipeline reads are modelled; everything else
//! in the documents is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerResponse {
    pub data: PlayerData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerData {
    pub id: String,
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub relationships: PlayerRelationships,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerAttributes {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRelationships {
    #[serde(default)]
    pub matches: RelationshipList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Vec<ResourceIdentifier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl PlayerData {
    /// Ids of the matches listed in the player's history
    pub fn match_ids(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .matches
            .data
            .iter()
            .filter(|resource| resource.kind == "match")
            .map(|resource| resource.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
    pub data: MatchData,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchData {
    pub id: String,
    pub attributes: MatchAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAttributes {
    pub created_at: DateTime<Utc>,
    pub map_name: String,
    #[serde(default)]
    pub duration: Option<i32>,
}

/// Entries of the `included` list of a match document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncludedResource {
    Participant { attributes: ParticipantAttributes },
    Asset { attributes: AssetAttributes },
    Roster,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantAttributes {
    pub stats: ParticipantStats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    pub player_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub damage_dealt: f64,
    #[serde(default)]
    pub ride_distance: f64,
    #[serde(default)]
    pub walk_distance: f64,
    #[serde(default)]
    pub time_survived: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetAttributes {
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
}
