//! Phase B of match ingestion: replaying a decoded telemetry log against the
//! match row and its per-player stats rows.
//!
//! The replay mutates rows in memory only; the caller loads them beforehand
//! and persists them afterwards. Counters that accumulate across events are
//! reset first, so replaying the same log again yields the same rows.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::pubg::AccountKind;
use crate::stats::{compute_killscore, normalize_cause, Match, PlayerMatchStats};
use crate::telemetry::{PlayerKill, PlayerTakeDamage, TelemetryEvent, VehicleRide};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events walked, including the one that ended the replay
    pub events_walked: usize,
    /// Events that involved forsen and were dispatched to a handler
    pub events_applied: usize,
    pub tracked_player_died: bool,
}

pub struct TelemetryReplay<'a> {
    tracked_player_id: &'a str,
    record: &'a mut Match,
    rows: BTreeMap<String, PlayerMatchStats>,
}

fn increment(counter: &mut Option<i32>) {
    *counter = Some(counter.unwrap_or(0) + 1);
}

impl<'a> TelemetryReplay<'a> {
    pub fn new(
        tracked_player_id: &'a str,
        record: &'a mut Match,
        rows: Vec<PlayerMatchStats>,
    ) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| (row.player_id.clone(), row))
            .collect();

        Self {
            tracked_player_id,
            record,
            rows,
        }
    }

    /// Stats rows after the replay, ordered by player id
    pub fn into_rows(self) -> Vec<PlayerMatchStats> {
        self.rows.into_values().collect()
    }

    /// Resets the incrementable counters, then applies events in order until
    /// the log ends or forsen dies.
    pub fn run(&mut self, events: &[TelemetryEvent]) -> ReplaySummary {
        self.reset_incrementable_stats();

        let mut summary = ReplaySummary::default();
        for event in events {
            summary.events_walked += 1;

            match event {
                TelemetryEvent::PlayerKill(kill) if self.kill_involves_tracked(kill) => {
                    summary.events_applied += 1;
                    self.apply_kill(kill);
                    if self.is_tracked(&kill.victim.account_id) {
                        // Nothing after forsen's death matters
                        summary.tracked_player_died = true;
                        break;
                    }
                }
                TelemetryEvent::PlayerTakeDamage(damage)
                    if self.is_tracked(&damage.victim.account_id) =>
                {
                    summary.events_applied += 1;
                    self.apply_damage(damage);
                }
                TelemetryEvent::VehicleRide(ride) if self.ride_involves_tracked(ride) => {
                    summary.events_applied += 1;
                    self.apply_vehicle_ride(ride);
                }
                _ => {}
            }
        }

        debug!(
            match_id = %self.record.id,
            events_walked = summary.events_walked,
            events_applied = summary.events_applied,
            tracked_player_died = summary.tracked_player_died,
            "Telemetry replayed"
        );
        summary
    }

    fn reset_incrementable_stats(&mut self) {
        if self.record.is_forsen_match {
            self.record.nb_forsen_kills = Some(0);
            self.record.nb_forsen_bot_kills = Some(0);
        }
        for row in self.rows.values_mut() {
            row.damage_to_forsen = Some(0.0);
        }
    }

    fn is_tracked(&self, account_id: &str) -> bool {
        account_id == self.tracked_player_id
    }

    fn kill_involves_tracked(&self, kill: &PlayerKill) -> bool {
        self.is_tracked(&kill.victim.account_id)
            || kill
                .killer_account()
                .is_some_and(|killer| self.is_tracked(killer))
    }

    fn ride_involves_tracked(&self, ride: &VehicleRide) -> bool {
        self.is_tracked(&ride.character.account_id)
            || ride
                .fellow_passengers
                .iter()
                .any(|passenger| self.is_tracked(&passenger.account_id))
    }

    fn row_mut(&mut self, player_id: &str) -> Option<&mut PlayerMatchStats> {
        let row = self.rows.get_mut(player_id);
        if row.is_none() {
            warn!(
                match_id = %self.record.id,
                player_id = %player_id,
                "Telemetry references a player without stats row, skipping"
            );
        }
        row
    }

    fn apply_kill(&mut self, kill: &PlayerKill) {
        let cause = normalize_cause(&kill.killer_damage_info.damage_type_category).to_string();
        let victim_id = kill.victim.account_id.as_str();

        match AccountKind::classify(victim_id) {
            AccountKind::Npc => return,
            AccountKind::Bot => {
                increment(&mut self.record.nb_forsen_kills);
                increment(&mut self.record.nb_forsen_bot_kills);
                return;
            }
            AccountKind::Player => {}
        }

        if kill.is_suicide {
            if self.is_tracked(victim_id) {
                self.record.forsen_died_to_cause = Some(cause.clone());
            }
            if let Some(row) = self.row_mut(victim_id) {
                row.killed_by_forsen_with = Some(cause.clone());
                row.killed_forsen_with = Some(cause);
            }
            return;
        }

        if self.is_tracked(victim_id) {
            self.apply_tracked_death(kill, cause);
        } else {
            // Forsen is the killer here
            increment(&mut self.record.nb_forsen_kills);
            if let Some(row) = self.row_mut(victim_id) {
                row.killed_by_forsen_with = Some(cause);
            }
        }
    }

    fn apply_tracked_death(&mut self, kill: &PlayerKill, cause: String) {
        let rank = kill.victim_rank();
        if rank.is_some() {
            self.record.forsen_final_rank = rank;
        }
        self.record.forsen_died_to_cause = Some(cause.clone());

        let Some(killer_id) = kill.killer_account() else {
            debug!(match_id = %self.record.id, cause = %cause, "Forsen died without a killer");
            return;
        };
        self.record.forsen_died_to_account = Some(killer_id.to_string());
        info!(
            match_id = %self.record.id,
            killer_id = %killer_id,
            killer_name = kill.killer_name(),
            cause = %cause,
            weapon = kill.weapon(),
            rank = ?rank,
            "Forsen killed"
        );

        if !AccountKind::classify(killer_id).is_player() {
            return;
        }

        let match_id = self.record.id.clone();
        let Some(row) = self.row_mut(killer_id) else {
            return;
        };
        row.killed_forsen_with = Some(cause.clone());
        match rank {
            Some(rank) => {
                row.forsen_final_rank = Some(rank);
                row.killscore = compute_killscore(rank, &cause);
            }
            None => {
                warn!(match_id = %match_id, killer_id = %killer_id, "Forsen death without final rank");
            }
        }
    }

    fn apply_damage(&mut self, damage: &PlayerTakeDamage) {
        let Some(attacker_id) = damage.attacker_account() else {
            return;
        };
        if self.is_tracked(attacker_id) || !AccountKind::classify(attacker_id).is_player() {
            return;
        }

        if let Some(row) = self.row_mut(attacker_id) {
            row.damage_to_forsen = Some(row.damage_to_forsen.unwrap_or(0.0) + damage.damage);
        }
    }

    // Rides involving forsen are recognised but do not feed any stat yet
    fn apply_vehicle_ride(&mut self, _ride: &VehicleRide) {}
}
