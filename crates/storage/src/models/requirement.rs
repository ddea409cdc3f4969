use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Gender, Level};

/// Upper age bound used when the table stores `0` ("no upper limit").
pub const UNBOUNDED_MAX_AGE: i32 = 100;

/// One row of the requirement table: thresholds of a discipline for a
/// year, gender and age range.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Requirement {
    pub requirement_id: Uuid,
    pub discipline_id: Uuid,
    pub year: i32,
    pub gender: String,
    pub age_min: i32,
    pub age_max: i32,
    pub bronze: Option<Decimal>,
    pub silver: Option<Decimal>,
    pub gold: Option<Decimal>,
    pub counts_as_swimming: bool,
}

impl Requirement {
    pub fn effective_max_age(&self) -> i32 {
        if self.age_max == 0 {
            UNBOUNDED_MAX_AGE
        } else {
            self.age_max
        }
    }

    pub fn covers_age(&self, age: i32) -> bool {
        self.age_min <= age && age <= self.effective_max_age()
    }

    pub fn gender(&self) -> Gender {
        Gender::normalize(Some(&self.gender))
    }

    /// Threshold of a tier, `None` when the tier cannot be reached.
    ///
    /// A stored zero is treated like a missing value.
    pub fn threshold(&self, level: Level) -> Option<Decimal> {
        let value = match level {
            Level::Gold => self.gold,
            Level::Silver => self.silver,
            Level::Bronze => self.bronze,
            Level::None => None,
        };
        value.filter(|v| *v > Decimal::ZERO)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn requirement(
        discipline_id: Uuid,
        bronze: Option<Decimal>,
        silver: Option<Decimal>,
        gold: Option<Decimal>,
    ) -> Requirement {
        Requirement {
            requirement_id: Uuid::new_v4(),
            discipline_id,
            year: 2025,
            gender: "FEMALE".to_string(),
            age_min: 10,
            age_max: 11,
            bronze,
            silver,
            gold,
            counts_as_swimming: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::requirement;
    use super::*;

    #[test]
    fn test_zero_max_age_is_unbounded() {
        let mut req = requirement(Uuid::new_v4(), None, None, None);
        req.age_min = 18;
        req.age_max = 0;
        assert_eq!(req.effective_max_age(), UNBOUNDED_MAX_AGE);
        assert!(req.covers_age(18));
        assert!(req.covers_age(67));
        assert!(!req.covers_age(17));
    }

    #[test]
    fn test_age_range_is_inclusive() {
        let req = requirement(Uuid::new_v4(), None, None, None);
        assert!(req.covers_age(10));
        assert!(req.covers_age(11));
        assert!(!req.covers_age(9));
        assert!(!req.covers_age(12));
    }

    #[test]
    fn test_zero_threshold_is_unreachable() {
        let req = requirement(
            Uuid::new_v4(),
            Some(Decimal::ZERO),
            Some(Decimal::new(35, 1)),
            None,
        );
        assert_eq!(req.threshold(Level::Bronze), None);
        assert_eq!(req.threshold(Level::Silver), Some(Decimal::new(35, 1)));
        assert_eq!(req.threshold(Level::Gold), None);
    }
}
