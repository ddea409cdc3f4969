use super::models::{DisciplineData, FORMAT_VERSION, RequirementTable};
use crate::{ImporterError, Result};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use storage::models::{Category, Direction, Gender};
use tracing::warn;

pub struct CanonicalValidator;

impl CanonicalValidator {
    pub fn validate(table: &RequirementTable) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if table.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                table.format_version, FORMAT_VERSION
            ));
        }

        if !(2000..=2100).contains(&table.year) {
            report
                .errors
                .push(format!("Exam year {} is out of range", table.year));
        }

        if table.disciplines.is_empty() {
            report
                .errors
                .push("At least one discipline is required".to_string());
        }

        let mut discipline_names = HashSet::new();
        for discipline in &table.disciplines {
            if discipline.name.trim().is_empty() {
                report
                    .errors
                    .push("Discipline name cannot be empty".to_string());
            }
            if !discipline_names.insert(discipline.name.trim().to_lowercase()) {
                report
                    .errors
                    .push(format!("Duplicate discipline: '{}'", discipline.name));
            }
            if discipline.category.parse::<Category>().is_err() {
                report.errors.push(format!(
                    "Discipline '{}' has unknown category '{}'",
                    discipline.name, discipline.category
                ));
            }

            validate_rows(discipline, &mut report);
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

fn validate_rows(discipline: &DisciplineData, report: &mut ValidationReport) {
    let name = &discipline.name;
    let unmeasured = discipline.unit_or_none() == storage::models::UNIT_NONE;
    let shortcut = unmeasured
        && discipline
            .verband
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());

    if discipline.requirements.is_empty() && !shortcut {
        report
            .warnings
            .push(format!("Discipline '{}' has no requirement rows", name));
    }
    if unmeasured && !shortcut {
        report.warnings.push(format!(
            "Discipline '{}' has no unit and no association, it can never score",
            name
        ));
    }

    let mut ranges: HashMap<Gender, Vec<(i32, i32)>> = HashMap::new();

    for row in &discipline.requirements {
        let label = format!("'{}' {} {}-{}", name, row.gender, row.age_min, row.age_max);

        let Some(gender) = Gender::recognize(&row.gender) else {
            report.errors.push(format!(
                "Requirement {} has invalid gender. Must start with M, F or W",
                label
            ));
            continue;
        };

        if row.age_min < 0 {
            report
                .errors
                .push(format!("Requirement {} has a negative minimum age", label));
        }
        if row.age_max != 0 && row.age_max < row.age_min {
            report
                .errors
                .push(format!("Requirement {} has age_max below age_min", label));
        }

        let thresholds = row.thresholds();
        if thresholds.iter().flatten().any(|t| t.is_sign_negative()) {
            report
                .errors
                .push(format!("Requirement {} has a negative threshold", label));
        }
        if thresholds.iter().flatten().any(|t| t.is_zero()) {
            report.warnings.push(format!(
                "Requirement {} has a zero threshold, that tier is unreachable",
                label
            ));
        }
        if !unmeasured && thresholds.iter().all(|t| t.is_none_or(|t| t <= Decimal::ZERO)) {
            report
                .warnings
                .push(format!("Requirement {} has no reachable tier", label));
        }
        if !tiers_ordered(thresholds, discipline.direction) {
            report.warnings.push(format!(
                "Requirement {} has tiers out of order for {:?}",
                label, discipline.direction
            ));
        }

        let slot = ranges.entry(gender).or_default();
        let (min, max) = (row.age_min, row.effective_age_max());
        if slot.iter().any(|&(lo, hi)| min <= hi && lo <= max) {
            report.warnings.push(format!(
                "Requirement {} overlaps another age range, lookups take the first match",
                label
            ));
        }
        slot.push((min, max));
    }
}

/// Bronze must be the easiest tier and gold the hardest
fn tiers_ordered(thresholds: [Option<Decimal>; 3], direction: Direction) -> bool {
    let reachable: Vec<Decimal> = thresholds
        .into_iter()
        .flatten()
        .filter(|t| *t > Decimal::ZERO)
        .collect();

    reachable.windows(2).all(|pair| match direction {
        Direction::GreaterIsBetter => pair[0] <= pair[1],
        Direction::SmallerIsBetter => pair[0] >= pair[1],
    })
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::models::{RequirementRow, SourceMetadata, SourceType};

    fn dec(s: &str) -> Option<Decimal> {
        Some(s.parse().unwrap())
    }

    fn row(gender: &str, age_min: i32, age_max: i32, tiers: [Option<Decimal>; 3]) -> RequirementRow {
        RequirementRow {
            gender: gender.to_string(),
            age_min,
            age_max,
            bronze: tiers[0],
            silver: tiers[1],
            gold: tiers[2],
            counts_as_swimming: false,
        }
    }

    fn table(disciplines: Vec<DisciplineData>) -> RequirementTable {
        RequirementTable {
            format_version: FORMAT_VERSION.to_string(),
            source: SourceMetadata {
                r#type: SourceType::Manual,
                extracted_at: chrono::Utc::now(),
                extractor: "test".to_string(),
                original_filename: None,
            },
            year: 2025,
            disciplines,
        }
    }

    fn run_800m(rows: Vec<RequirementRow>) -> DisciplineData {
        DisciplineData {
            name: "800 m Lauf".to_string(),
            category: "Ausdauer".to_string(),
            unit: Some("SECONDS".to_string()),
            direction: Direction::SmallerIsBetter,
            verband: None,
            requirements: rows,
        }
    }

    #[test]
    fn test_valid_table_passes() {
        let t = table(vec![run_800m(vec![
            row("FEMALE", 10, 11, [dec("300"), dec("270"), dec("240")]),
            row("FEMALE", 12, 0, [dec("280"), dec("250"), dec("220")]),
            row("MALE", 10, 11, [dec("290"), dec("260"), dec("230")]),
        ])]);

        let report = CanonicalValidator::validate(&t).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let mut d = run_800m(vec![row("F", 10, 11, [dec("300"), None, None])]);
        d.category = "Jonglieren".to_string();

        let err = CanonicalValidator::validate(&table(vec![d])).unwrap_err();
        assert!(err.to_string().contains("unknown category"));
    }

    #[test]
    fn test_invalid_gender_and_ages_are_errors() {
        let t = table(vec![run_800m(vec![
            row("X", 10, 11, [dec("300"), None, None]),
            row("M", 12, 10, [dec("300"), None, None]),
        ])]);

        let err = CanonicalValidator::validate(&t).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2 error(s)"), "{message}");
    }

    #[test]
    fn test_zero_threshold_is_only_a_warning() {
        let t = table(vec![run_800m(vec![row(
            "W",
            10,
            11,
            [dec("300"), dec("0"), dec("240")],
        )])]);

        let report = CanonicalValidator::validate(&t).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("zero threshold"));
    }

    #[test]
    fn test_overlapping_age_ranges_warn() {
        let t = table(vec![run_800m(vec![
            row("F", 10, 12, [dec("300"), None, None]),
            row("F", 12, 13, [dec("290"), None, None]),
            row("M", 12, 13, [dec("290"), None, None]),
        ])]);

        let report = CanonicalValidator::validate(&t).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("overlaps"));
    }

    #[test]
    fn test_open_ended_range_overlaps_later_rows() {
        let t = table(vec![run_800m(vec![
            row("F", 50, 0, [dec("300"), None, None]),
            row("F", 60, 64, [dec("320"), None, None]),
        ])]);

        let report = CanonicalValidator::validate(&t).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("overlaps")));
    }

    #[test]
    fn test_tiers_out_of_order_warn() {
        let t = table(vec![run_800m(vec![row(
            "F",
            10,
            11,
            [dec("240"), dec("270"), dec("300")],
        )])]);

        let report = CanonicalValidator::validate(&t).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("out of order")));
    }

    #[test]
    fn test_association_discipline_needs_no_rows() {
        let t = table(vec![DisciplineData {
            name: "DLRG Rettungsschwimmer".to_string(),
            category: "Schwimmen".to_string(),
            unit: None,
            direction: Direction::GreaterIsBetter,
            verband: Some("DLRG".to_string()),
            requirements: vec![],
        }]);

        let report = CanonicalValidator::validate(&t).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_duplicate_discipline_is_an_error() {
        let rows = vec![row("F", 10, 11, [dec("300"), None, None])];
        let t = table(vec![run_800m(rows.clone()), run_800m(rows)]);

        assert!(CanonicalValidator::validate(&t).is_err());
    }
}
