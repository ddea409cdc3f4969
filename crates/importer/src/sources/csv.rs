//! Flat requirement tables as exported from spreadsheets.
//!
//! One row per discipline, gender and age range, `;` separated:
//!
//! ```text
//! discipline;category;unit;direction;verband;gender;age_min;age_max;bronze;silver;gold;counts_as_swimming
//! 800 m Lauf;Ausdauer;SECONDS;SMALLER_IS_BETTER;;W;10;11;300;270;240;nein
//! ```
//!
//! Thresholds accept a decimal comma. Consecutive rows of the same discipline
//! are grouped; the discipline columns of its first row win.

use crate::{
    ImporterError, RequirementSource, Result,
    canonical::models::{
        DisciplineData, FORMAT_VERSION, RequirementRow, RequirementTable, SourceMetadata,
        SourceType,
    },
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{io::Read, path::PathBuf};
use storage::models::Direction;

pub struct CsvSource {
    path: PathBuf,
    year: i32,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, year: i32) -> Self {
        Self {
            path: path.into(),
            year,
        }
    }
}

#[async_trait::async_trait]
impl RequirementSource for CsvSource {
    fn describe(&self) -> String {
        format!("CSV {} for {}", self.path.display(), self.year)
    }

    async fn load(&self) -> Result<RequirementTable> {
        let bytes = tokio::fs::read(&self.path).await?;
        let filename = self
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned());

        let mut table = parse_table(bytes.as_slice(), self.year)?;
        table.source.original_filename = filename;
        Ok(table)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    discipline: String,
    category: String,
    #[serde(default)]
    unit: Option<String>,
    direction: String,
    #[serde(default)]
    verband: Option<String>,
    gender: String,
    age_min: i32,
    #[serde(default)]
    age_max: Option<i32>,
    #[serde(default)]
    bronze: Option<String>,
    #[serde(default)]
    silver: Option<String>,
    #[serde(default)]
    gold: Option<String>,
    #[serde(default)]
    counts_as_swimming: Option<String>,
}

/// Read a `;` separated requirement table for one exam year
pub fn parse_table(reader: impl Read, year: i32) -> Result<RequirementTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut disciplines: Vec<DisciplineData> = Vec::new();

    for (idx, record) in reader.deserialize::<CsvRow>().enumerate() {
        let line = idx + 2;
        let row = record?;

        let requirement = RequirementRow {
            gender: row.gender,
            age_min: row.age_min,
            age_max: row.age_max.unwrap_or(0),
            bronze: parse_threshold(row.bronze.as_deref(), line)?,
            silver: parse_threshold(row.silver.as_deref(), line)?,
            gold: parse_threshold(row.gold.as_deref(), line)?,
            counts_as_swimming: parse_flag(row.counts_as_swimming.as_deref(), line)?,
        };

        match disciplines.last_mut() {
            Some(current) if current.name == row.discipline => {
                current.requirements.push(requirement)
            }
            _ => disciplines.push(DisciplineData {
                direction: parse_direction(&row.direction, line)?,
                name: row.discipline,
                category: row.category,
                unit: row.unit.filter(|u| !u.is_empty()),
                verband: row.verband.filter(|v| !v.is_empty()),
                requirements: vec![requirement],
            }),
        }
    }

    Ok(RequirementTable {
        format_version: FORMAT_VERSION.to_string(),
        source: SourceMetadata {
            r#type: SourceType::Csv,
            extracted_at: chrono::Utc::now(),
            extractor: "csv".to_string(),
            original_filename: None,
        },
        year,
        disciplines,
    })
}

fn parse_threshold(raw: Option<&str>, line: usize) -> Result<Option<Decimal>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.replace(',', ".").parse().map(Some).map_err(|_| {
            ImporterError::TransformationError(format!(
                "line {}: '{}' is not a number",
                line, value
            ))
        }),
    }
}

fn parse_flag(raw: Option<&str>, line: usize) -> Result<bool> {
    match raw.map(|v| v.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(false),
        Some("1" | "true" | "yes" | "ja" | "x") => Ok(true),
        Some("0" | "false" | "no" | "nein") => Ok(false),
        Some(other) => Err(ImporterError::TransformationError(format!(
            "line {}: '{}' is not a yes/no value",
            line, other
        ))),
    }
}

fn parse_direction(raw: &str, line: usize) -> Result<Direction> {
    match raw.trim().to_uppercase().as_str() {
        "GREATER_IS_BETTER" | ">" => Ok(Direction::GreaterIsBetter),
        "SMALLER_IS_BETTER" | "<" => Ok(Direction::SmallerIsBetter),
        other => Err(ImporterError::TransformationError(format!(
            "line {}: unknown direction '{}'",
            line, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "discipline;category;unit;direction;verband;gender;age_min;age_max;bronze;silver;gold;counts_as_swimming\n";

    fn parse(body: &str) -> Result<RequirementTable> {
        parse_table(format!("{HEADER}{body}").as_bytes(), 2025)
    }

    #[test]
    fn test_rows_are_grouped_by_discipline() {
        let table = parse(
            "800 m Lauf;Ausdauer;SECONDS;SMALLER_IS_BETTER;;W;10;11;300;270;240;nein\n\
             800 m Lauf;Ausdauer;SECONDS;SMALLER_IS_BETTER;;M;10;11;290;260;230;\n\
             Weitsprung;Schnelligkeit;METERS;GREATER_IS_BETTER;;W;10;11;2,80;3,10;3,40;\n",
        )
        .unwrap();

        assert_eq!(table.year, 2025);
        assert_eq!(table.disciplines.len(), 2);
        assert_eq!(table.disciplines[0].requirements.len(), 2);
        assert_eq!(table.disciplines[0].direction, Direction::SmallerIsBetter);
        assert_eq!(
            table.disciplines[1].requirements[0].gold,
            Some("3.40".parse().unwrap())
        );
    }

    #[test]
    fn test_empty_cells_become_none() {
        let table = parse("200 m Schwimmen;Schwimmen;SECONDS;SMALLER_IS_BETTER;;F;18;;;;;ja\n").unwrap();

        let row = &table.disciplines[0].requirements[0];
        assert_eq!(row.age_max, 0);
        assert_eq!(row.thresholds(), [None, None, None]);
        assert!(row.counts_as_swimming);
    }

    #[test]
    fn test_association_row_keeps_verband_and_no_unit() {
        let table = parse("DLRG Bronze;Schwimmen;;GREATER_IS_BETTER;DLRG;F;10;0;;;;1\n").unwrap();

        let discipline = &table.disciplines[0];
        assert_eq!(discipline.unit, None);
        assert_eq!(discipline.verband.as_deref(), Some("DLRG"));
        assert_eq!(discipline.unit_or_none(), "NONE");
    }

    #[test]
    fn test_bad_threshold_names_the_line() {
        let err = parse("Weitsprung;Schnelligkeit;METERS;GREATER_IS_BETTER;;W;10;11;weit;3;4;\n").unwrap_err();

        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert!(parse("Weitsprung;Schnelligkeit;METERS;UP;;W;10;11;1;2;3;\n").is_err());
    }
}
