//! Kill score: how much killing forsen was worth, from his final rank and
//! the damage category that finished him.

use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};
use tracing::warn;

const BASE_KILL_VALUE: f64 = 44682.0;
const RANK_LOG_WEIGHT: f64 = 9389.0;

/// Gun kills are only rewarded up to this rank
pub const GUN_RANK_CUTOFF: i32 = 5;

const STICKY_BOMB_CAUSE: &str = "Damage_Explosion_StickyBomb";

/// Damage categories with a kill score multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString)]
pub enum DamageCategory {
    #[strum(serialize = "Damage_Explosion_Vehicle")]
    VehicleExplosion,
    #[strum(serialize = "Damage_Melee")]
    Melee,
    #[strum(serialize = "Damage_Punch")]
    Punch,
    #[strum(serialize = "Damage_Explosion_C4")]
    C4,
    #[strum(serialize = "Damage_Molotov")]
    Molotov,
    #[strum(serialize = "Damage_Explosion_Grenade")]
    Grenade,
    #[strum(serialize = "Damage_MeleeThrow")]
    MeleeThrow,
    #[strum(serialize = "Damage_VehicleHit")]
    VehicleHit,
    #[strum(serialize = "Damage_Explosion_PanzerFaustWarhead")]
    PanzerFaust,
    #[strum(serialize = "Damage_Gun")]
    Gun,
}

impl DamageCategory {
    pub fn multiplier(self) -> f64 {
        match self {
            DamageCategory::VehicleExplosion => 10.0,
            DamageCategory::Melee | DamageCategory::Punch => 5.0,
            DamageCategory::C4 | DamageCategory::Molotov => 3.0,
            DamageCategory::Grenade | DamageCategory::MeleeThrow => 1.5,
            DamageCategory::VehicleHit => 1.0,
            DamageCategory::PanzerFaust => 0.1,
            DamageCategory::Gun => 0.5,
        }
    }
}

/// Folds sticky bombs into the C4 category; other causes pass through
pub fn normalize_cause(cause: &str) -> &str {
    if cause == STICKY_BOMB_CAUSE {
        DamageCategory::C4.as_ref()
    } else {
        cause
    }
}

/// Unmultiplied value of a kill at the given final rank
pub fn base_kill_value(rank: i32) -> f64 {
    BASE_KILL_VALUE - RANK_LOG_WEIGHT * f64::from(rank).ln()
}

/// Kill score for eliminating forsen at `rank` with `cause`.
///
/// Ranks start at 1; a rank below that is logged and scores zero. Causes
/// missing from the multiplier table score the bare base value.
pub fn compute_killscore(rank: i32, cause: &str) -> f64 {
    if rank < 1 {
        warn!(rank, cause = %cause, "Kill score requested for invalid rank");
        return 0.0;
    }

    let category = DamageCategory::from_str(cause).ok();
    if category == Some(DamageCategory::Gun) && rank > GUN_RANK_CUTOFF {
        return 0.0;
    }

    let base = base_kill_value(rank);
    match category {
        Some(category) => category.multiplier() * base,
        None => {
            warn!(cause = %cause, rank, "Unhandled kill score multiplier");
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;
    use std::sync::{Arc, Mutex};
    use strum::IntoEnumIterator;

    /// Collects formatted log lines so tests can assert on them
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn rank_one_gives_maximum_base() {
        assert!(approx_eq(base_kill_value(1), 44682.0));
    }

    #[test]
    fn decreases_with_rank() {
        let first = compute_killscore(1, "Damage_Explosion_Vehicle");
        let fiftieth = compute_killscore(50, "Damage_Explosion_Vehicle");
        assert!(first > fiftieth);
        assert!(fiftieth > 0.0);
    }

    #[rstest]
    #[case(6, false)]
    #[case(50, false)]
    #[case(5, true)]
    #[case(1, true)]
    fn gun_kills_only_count_in_top_five(#[case] rank: i32, #[case] rewarded: bool) {
        let score = compute_killscore(rank, "Damage_Gun");
        assert_eq!(score > 0.0, rewarded);
        if rewarded {
            assert!(approx_eq(score, 0.5 * base_kill_value(rank)));
        }
    }

    #[rstest]
    #[case("Damage_Explosion_Vehicle", 10.0)]
    #[case("Damage_Melee", 5.0)]
    #[case("Damage_Punch", 5.0)]
    #[case("Damage_Explosion_C4", 3.0)]
    #[case("Damage_Molotov", 3.0)]
    #[case("Damage_Explosion_Grenade", 1.5)]
    #[case("Damage_MeleeThrow", 1.5)]
    #[case("Damage_VehicleHit", 1.0)]
    #[case("Damage_Explosion_PanzerFaustWarhead", 0.1)]
    fn applies_cause_multiplier(#[case] cause: &str, #[case] multiplier: f64) {
        let score = compute_killscore(20, cause);
        assert!(approx_eq(score, multiplier * base_kill_value(20)));
    }

    #[test]
    fn every_category_parses_back_from_its_name() {
        for category in DamageCategory::iter() {
            assert_eq!(DamageCategory::from_str(category.as_ref()), Ok(category));
            assert!(category.multiplier() > 0.0);
        }
    }

    #[test]
    fn unknown_cause_falls_back_to_base() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let score = tracing::subscriber::with_default(subscriber, || {
            compute_killscore(7, "Damage_Drown")
        });
        assert!(approx_eq(score, base_kill_value(7)));

        let output = logs.contents();
        assert!(output.contains("WARN"), "got: {}", output);
        assert!(output.contains("Unhandled kill score multiplier"), "got: {}", output);
        assert!(output.contains("Damage_Drown"), "got: {}", output);
    }

    #[test]
    fn known_cause_logs_nothing() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || compute_killscore(2, "Damage_Gun"));
        assert!(!logs.contents().contains("Unhandled"));
    }

    #[test]
    fn melee_at_rank_three() {
        let expected = 5.0 * (44682.0 - 9389.0 * 3f64.ln());
        assert!(approx_eq(compute_killscore(3, "Damage_Melee"), expected));
    }

    #[test]
    fn invalid_rank_scores_zero() {
        assert_eq!(compute_killscore(0, "Damage_Melee"), 0.0);
        assert_eq!(compute_killscore(-2, "Damage_Melee"), 0.0);
    }

    #[test]
    fn sticky_bomb_normalizes_to_c4() {
        assert_eq!(
            normalize_cause("Damage_Explosion_StickyBomb"),
            "Damage_Explosion_C4"
        );
        assert_eq!(normalize_cause("Damage_Gun"), "Damage_Gun");
        assert_eq!(normalize_cause(""), "");
    }
}
