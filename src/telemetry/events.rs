use serde::Deserialize;

/// One entry of a match telemetry log, discriminated by its `_T` field.
///
/// Only the event kinds the replay consumes carry a payload; every other
/// kind decodes to [`TelemetryEvent::Other`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_T")]
pub enum TelemetryEvent {
    #[serde(rename = "LogPlayerKillV2")]
    PlayerKill(PlayerKill),
    #[serde(rename = "LogPlayerTakeDamage")]
    PlayerTakeDamage(PlayerTakeDamage),
    #[serde(rename = "LogVehicleRide")]
    VehicleRide(VehicleRide),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub name: String,
}

impl Character {
    /// Account id, or `None` when the log left it blank
    pub fn account(&self) -> Option<&str> {
        if self.account_id.is_empty() {
            None
        } else {
            Some(&self.account_id)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageInfo {
    #[serde(default)]
    pub damage_type_category: String,
    #[serde(default)]
    pub damage_causer_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VictimGameResult {
    #[serde(default)]
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKill {
    pub victim: Character,
    #[serde(default)]
    pub killer: Option<Character>,
    #[serde(default)]
    pub killer_damage_info: DamageInfo,
    #[serde(default)]
    pub is_suicide: bool,
    #[serde(default)]
    pub victim_game_result: Option<VictimGameResult>,
}

impl PlayerKill {
    pub fn killer_account(&self) -> Option<&str> {
        self.killer.as_ref().and_then(Character::account)
    }

    /// Display name of the killer, empty for environment deaths
    pub fn killer_name(&self) -> &str {
        self.killer.as_ref().map_or("", |killer| killer.name.as_str())
    }

    /// In-game item that dealt the killing blow, e.g. `WeapPan_C`
    pub fn weapon(&self) -> &str {
        &self.killer_damage_info.damage_causer_name
    }

    pub fn victim_rank(&self) -> Option<i32> {
        self.victim_game_result.as_ref().and_then(|result| result.rank)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTakeDamage {
    #[serde(default)]
    pub attacker: Option<Character>,
    pub victim: Character,
    #[serde(default)]
    pub damage: f64,
}

impl PlayerTakeDamage {
    pub fn attacker_account(&self) -> Option<&str> {
        self.attacker.as_ref().and_then(Character::account)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRide {
    pub character: Character,
    #[serde(default)]
    pub fellow_passengers: Vec<Character>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_kill_event_payload() {
        let event: TelemetryEvent = serde_json::from_value(json!({
            "_T": "LogPlayerKillV2",
            "_D": "2023-04-01T18:45:00Z",
            "victim": { "accountId": "account.forsen", "name": "Forsen" },
            "killer": { "accountId": "account.other", "name": "other" },
            "killerDamageInfo": {
                "damageTypeCategory": "Damage_Melee",
                "damageCauserName": "WeapPan_C"
            },
            "isSuicide": false,
            "victimGameResult": { "rank": 3, "gameResult": "lost" }
        }))
        .unwrap();

        match event {
            TelemetryEvent::PlayerKill(kill) => {
                assert_eq!(kill.victim.account_id, "account.forsen");
                assert_eq!(kill.killer_account(), Some("account.other"));
                assert_eq!(kill.killer_damage_info.damage_type_category, "Damage_Melee");
                assert_eq!(kill.killer_name(), "other");
                assert_eq!(kill.weapon(), "WeapPan_C");
                assert_eq!(kill.victim_rank(), Some(3));
            }
            other => panic!("Expected kill event, got {:?}", other),
        }
    }

    #[test]
    fn null_or_blank_killer_has_no_account() {
        let event: PlayerKill = serde_json::from_value(json!({
            "victim": { "accountId": "account.forsen" },
            "killer": null,
            "killerDamageInfo": { "damageTypeCategory": "Damage_BlueZone" }
        }))
        .unwrap();
        assert_eq!(event.killer_account(), None);
        assert_eq!(event.killer_name(), "");
        assert_eq!(event.weapon(), "");

        let event: PlayerKill = serde_json::from_value(json!({
            "victim": { "accountId": "account.forsen" },
            "killer": { "accountId": "", "name": "" },
            "killerDamageInfo": { "damageTypeCategory": "Damage_VehicleCrashHit" }
        }))
        .unwrap();
        assert_eq!(event.killer_account(), None);
        assert!(!event.is_suicide);
    }

    #[test]
    fn unknown_event_kinds_decode_to_other() {
        let event: TelemetryEvent = serde_json::from_value(json!({
            "_T": "LogItemPickup",
            "character": { "accountId": "account.forsen" }
        }))
        .unwrap();
        assert!(matches!(event, TelemetryEvent::Other));
    }
}
