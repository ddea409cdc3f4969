use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::models::Direction;

pub const FORMAT_VERSION: &str = "1.0.0";

/// Requirement table of one exam year in the importer's interchange format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementTable {
    pub format_version: String,
    pub source: SourceMetadata,
    pub year: i32,
    pub disciplines: Vec<DisciplineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub r#type: SourceType,
    pub extracted_at: DateTime<Utc>,
    pub extractor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Csv,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplineData {
    pub name: String,
    /// English or German category name
    pub category: String,
    /// Defaults to `NONE`, the marker for disciplines without a measured value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verband: Option<String>,
    pub requirements: Vec<RequirementRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementRow {
    pub gender: String,
    pub age_min: i32,
    /// `0` leaves the range open-ended
    pub age_max: i32,
    #[serde(default)]
    pub bronze: Option<Decimal>,
    #[serde(default)]
    pub silver: Option<Decimal>,
    #[serde(default)]
    pub gold: Option<Decimal>,
    #[serde(default)]
    pub counts_as_swimming: bool,
}

impl RequirementRow {
    pub fn thresholds(&self) -> [Option<Decimal>; 3] {
        [self.bronze, self.silver, self.gold]
    }

    /// Upper age bound with `0` read as open-ended
    pub fn effective_age_max(&self) -> i32 {
        if self.age_max == 0 {
            storage::models::UNBOUNDED_MAX_AGE
        } else {
            self.age_max
        }
    }
}

impl DisciplineData {
    pub fn unit_or_none(&self) -> &str {
        self.unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(storage::models::UNIT_NONE)
    }
}
