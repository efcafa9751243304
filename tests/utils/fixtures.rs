#![allow(dead_code)]

use serde_json::{json, Value};

pub const FORSEN: &str = "account.forsen";

// ============================================================================
// API documents
// ============================================================================

pub fn participant(player_id: &str, name: &str) -> Value {
    json!({
        "type": "participant",
        "id": format!("participant-{}", player_id),
        "attributes": {
            "stats": {
                "playerId": player_id,
                "name": name,
                "damageDealt": 120.5,
                "rideDistance": 800.0,
                "walkDistance": 1500.25,
                "timeSurvived": 900.0,
                "kills": 1
            }
        }
    })
}

pub fn match_document(match_id: &str, participants: Vec<Value>, telemetry_url: Option<&str>) -> Value {
    let mut included = participants;
    included.push(json!({ "type": "roster", "id": "roster-1", "attributes": { "won": "false" } }));
    if let Some(url) = telemetry_url {
        included.push(json!({
            "type": "asset",
            "id": "asset-1",
            "attributes": { "name": "telemetry", "URL": url }
        }));
    }

    json!({
        "data": {
            "type": "match",
            "id": match_id,
            "attributes": {
                "createdAt": "2023-04-01T18:30:00Z",
                "mapName": "Baltic_Main",
                "duration": 1820,
                "gameMode": "squad-fpp"
            }
        },
        "included": included
    })
}

pub fn player_document(player_id: &str, name: &str, match_ids: &[&str]) -> Value {
    let matches: Vec<Value> = match_ids
        .iter()
        .map(|id| json!({ "type": "match", "id": id }))
        .collect();

    json!({
        "data": {
            "type": "player",
            "id": player_id,
            "attributes": { "name": name, "shardId": "steam" },
            "relationships": { "matches": { "data": matches } }
        }
    })
}

// ============================================================================
// Telemetry
// ============================================================================

fn character(account_id: &str) -> Value {
    json!({ "accountId": account_id, "name": account_id })
}

pub fn kill_event(victim: &str, killer: Option<&str>, cause: &str, rank: i32) -> Value {
    json!({
        "_T": "LogPlayerKillV2",
        "victim": character(victim),
        "killer": killer.map(character),
        "killerDamageInfo": { "damageTypeCategory": cause, "damageCauserName": "Item" },
        "isSuicide": false,
        "victimGameResult": { "rank": rank }
    })
}

pub fn suicide_event(victim: &str, cause: &str, rank: i32) -> Value {
    json!({
        "_T": "LogPlayerKillV2",
        "victim": character(victim),
        "killer": character(victim),
        "killerDamageInfo": { "damageTypeCategory": cause },
        "isSuicide": true,
        "victimGameResult": { "rank": rank }
    })
}

pub fn damage_event(attacker: Option<&str>, victim: &str, damage: f64) -> Value {
    json!({
        "_T": "LogPlayerTakeDamage",
        "attacker": attacker.map(character),
        "victim": character(victim),
        "damage": damage,
        "damageTypeCategory": "Damage_Gun"
    })
}

/// Serialized log with a match-start entry in front, as served by the API
pub fn telemetry_log(events: Vec<Value>) -> Vec<u8> {
    let mut log = vec![json!({ "_T": "LogMatchStart", "mapName": "Baltic_Main" })];
    log.extend(events);
    serde_json::to_vec(&log).unwrap()
}
