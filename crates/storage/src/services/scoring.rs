use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Direction, Discipline, Level, Requirement};

/// Points and tier awarded for one discipline result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub points: i32,
    pub level: Level,
}

impl Score {
    pub const ZERO: Score = Score {
        points: 0,
        level: Level::None,
    };

    pub fn from_level(level: Level) -> Self {
        Self {
            points: level.points(),
            level,
        }
    }
}

/// Scores a measured value against a requirement row.
///
/// Association disciplines (no unit, federation set) always earn gold. A
/// missing or non-positive value, or a missing requirement, earns nothing.
/// Values must already be expressed in the discipline's unit.
pub fn score(discipline: &Discipline, measured: Option<Decimal>, requirement: Option<&Requirement>) -> Score {
    if discipline.is_association_shortcut() {
        return Score::from_level(Level::Gold);
    }

    let (Some(value), Some(requirement)) = (measured, requirement) else {
        return Score::ZERO;
    };
    if value <= Decimal::ZERO {
        return Score::ZERO;
    }

    let direction = discipline.direction();
    Level::BEST_FIRST
        .into_iter()
        .find(|level| {
            requirement
                .threshold(*level)
                .is_some_and(|threshold| meets(direction, value, threshold))
        })
        .map(Score::from_level)
        .unwrap_or(Score::ZERO)
}

fn meets(direction: Direction, value: Decimal, threshold: Decimal) -> bool {
    match direction {
        Direction::GreaterIsBetter => value >= threshold,
        Direction::SmallerIsBetter => value <= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{association, discipline, requirement};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sprint() -> (Discipline, Requirement) {
        let d = discipline("60m Sprint", "Schnelligkeit", "SECONDS", false);
        let r = requirement(d.discipline_id, Some(dec("11.0")), Some(dec("10.0")), Some(dec("9.0")));
        (d, r)
    }

    fn long_jump() -> (Discipline, Requirement) {
        let d = discipline("Weitsprung", "Koordination", "METERS", true);
        let r = requirement(d.discipline_id, Some(dec("3.0")), Some(dec("3.5")), Some(dec("4.0")));
        (d, r)
    }

    #[test]
    fn test_timed_event_meets_silver_not_gold() {
        let (d, r) = sprint();
        let s = score(&d, Some(dec("9.5")), Some(&r));
        assert_eq!(s.points, 2);
        assert_eq!(s.level, Level::Silver);
    }

    #[test]
    fn test_distance_below_bronze_scores_nothing() {
        let (d, r) = long_jump();
        assert_eq!(score(&d, Some(dec("2.0")), Some(&r)), Score::ZERO);
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let (d, r) = sprint();
        assert_eq!(score(&d, Some(dec("9.0")), Some(&r)).level, Level::Gold);
        assert_eq!(score(&d, Some(dec("11.0")), Some(&r)).level, Level::Bronze);
        assert_eq!(score(&d, Some(dec("11.01")), Some(&r)).level, Level::None);

        let (d, r) = long_jump();
        assert_eq!(score(&d, Some(dec("4.0")), Some(&r)).level, Level::Gold);
        assert_eq!(score(&d, Some(dec("3.0")), Some(&r)).level, Level::Bronze);
    }

    #[test]
    fn test_association_awards_gold_without_value_or_requirement() {
        let d = association("DLRG Rettungsschwimmer", "Schwimmen", "DLRG");
        assert_eq!(score(&d, None, None), Score::from_level(Level::Gold));
        assert_eq!(score(&d, Some(dec("-1")), None).points, 3);
    }

    #[test]
    fn test_missing_inputs_score_zero() {
        let (d, r) = sprint();
        assert_eq!(score(&d, None, Some(&r)), Score::ZERO);
        assert_eq!(score(&d, Some(dec("9.5")), None), Score::ZERO);
        assert_eq!(score(&d, Some(Decimal::ZERO), Some(&r)), Score::ZERO);
        assert_eq!(score(&d, Some(dec("-3")), Some(&r)), Score::ZERO);
    }

    #[test]
    fn test_unreachable_tiers_are_skipped() {
        let d = discipline("Seilspringen", "Koordination", "REPETITIONS", true);
        let r = requirement(d.discipline_id, Some(dec("20")), None, Some(Decimal::ZERO));
        // Gold is zero and silver missing: a huge count still only earns bronze.
        assert_eq!(score(&d, Some(dec("500")), Some(&r)).level, Level::Bronze);

        let timed = discipline("Schwimmen 50m", "Schwimmen", "SECONDS", false);
        let r = requirement(timed.discipline_id, None, None, Some(Decimal::ZERO));
        assert_eq!(score(&timed, Some(dec("0.5")), Some(&r)), Score::ZERO);
    }

    #[test]
    fn test_greater_is_better_is_monotonic() {
        let (d, r) = long_jump();
        let mut last = 0;
        for tenth in 0..60 {
            let points = score(&d, Some(Decimal::new(tenth, 1)), Some(&r)).points;
            assert!(points >= last, "points dropped at {tenth}");
            last = points;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn test_smaller_is_better_is_monotonic() {
        let (d, r) = sprint();
        let mut last = 0;
        for tenth in (1..150).rev() {
            let points = score(&d, Some(Decimal::new(tenth, 1)), Some(&r)).points;
            assert!(points >= last, "points dropped at {tenth}");
            last = points;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let (d, r) = sprint();
        let first = score(&d, Some(dec("10.4")), Some(&r));
        let second = score(&d, Some(dec("10.4")), Some(&r));
        assert_eq!(first, second);
        assert!((0..=3).contains(&first.points));
    }

    #[test]
    fn test_submitted_value_scores_like_its_stored_form() {
        let (d, r) = sprint();
        let stored = crate::models::storable_value(dec("9.004")).unwrap();

        assert_eq!(stored, dec("9.00"));
        assert_eq!(score(&d, Some(stored), Some(&r)).level, Level::Gold);
        assert_eq!(
            score(&d, Some(stored), Some(&r)),
            score(&d, crate::models::storable_value(stored), Some(&r))
        );
    }
}
