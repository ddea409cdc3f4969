use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub participant_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: i32,
    pub gender: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Participant {
    pub fn gender(&self) -> Gender {
        Gender::normalize(self.gender.as_deref())
    }

    /// Age counted for an exam year: the age reached during that year.
    pub fn age_in(&self, exam_year: i32) -> i32 {
        exam_year - self.birth_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(birth_year: i32, gender: Option<&str>) -> Participant {
        Participant {
            participant_id: Uuid::new_v4(),
            first_name: "Lena".to_string(),
            last_name: "Vogt".to_string(),
            birth_year,
            gender: gender.map(str::to_string),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_age_is_reached_during_exam_year() {
        assert_eq!(participant(2013, Some("w")).age_in(2025), 12);
        assert_eq!(participant(2007, Some("m")).age_in(2025), 18);
    }

    #[test]
    fn test_loaded_gender_is_normalized() {
        assert_eq!(participant(1990, Some("männlich")).gender(), Gender::Male);
        assert_eq!(participant(1990, Some("W")).gender(), Gender::Female);
        assert_eq!(participant(1990, None).gender(), Gender::DEFAULT);
    }
}
