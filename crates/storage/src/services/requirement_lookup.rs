use uuid::Uuid;

use crate::models::{Gender, Requirement};

/// Picks the requirement row for a discipline, year, gender and age.
///
/// Returns `None` when the age falls outside every imported range; callers
/// score that as zero points.
pub fn find_requirement(
    table: &[Requirement],
    discipline_id: Uuid,
    year: i32,
    gender: Gender,
    age: i32,
) -> Option<&Requirement> {
    table.iter().find(|r| {
        r.discipline_id == discipline_id
            && r.year == year
            && r.gender() == gender
            && r.covers_age(age)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::requirement;

    fn row(discipline_id: Uuid, gender: &str, age_min: i32, age_max: i32) -> Requirement {
        let mut r = requirement(discipline_id, None, None, None);
        r.gender = gender.to_string();
        r.age_min = age_min;
        r.age_max = age_max;
        r
    }

    #[test]
    fn test_selects_matching_age_band() {
        let id = Uuid::new_v4();
        let table = vec![
            row(id, "FEMALE", 6, 7),
            row(id, "FEMALE", 8, 9),
            row(id, "MALE", 8, 9),
            row(id, "FEMALE", 18, 0),
        ];

        let found = find_requirement(&table, id, 2025, Gender::Female, 9).unwrap();
        assert_eq!(found.age_min, 8);
        assert_eq!(found.gender(), Gender::Female);

        let adult = find_requirement(&table, id, 2025, Gender::Female, 45).unwrap();
        assert_eq!(adult.age_min, 18);
    }

    #[test]
    fn test_no_match_outside_ranges_or_year() {
        let id = Uuid::new_v4();
        let table = vec![row(id, "FEMALE", 8, 9)];

        assert!(find_requirement(&table, id, 2025, Gender::Female, 12).is_none());
        assert!(find_requirement(&table, id, 2024, Gender::Female, 8).is_none());
        assert!(find_requirement(&table, id, 2025, Gender::Male, 8).is_none());
        assert!(find_requirement(&table, Uuid::new_v4(), 2025, Gender::Female, 8).is_none());
    }
}
