use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Category;

/// Unit marker for disciplines that are awarded without a measurement.
pub const UNIT_NONE: &str = "NONE";

/// How a measured value is compared against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Distances, counts, points.
    GreaterIsBetter,
    /// Timed events.
    SmallerIsBetter,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Discipline {
    pub discipline_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub greater_is_better: bool,
    pub verband: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Discipline {
    /// Parsed category; `None` when the stored name is not recognized.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    pub fn direction(&self) -> Direction {
        if self.greater_is_better {
            Direction::GreaterIsBetter
        } else {
            Direction::SmallerIsBetter
        }
    }

    pub fn is_unmeasured(&self) -> bool {
        let unit = self.unit.trim();
        unit.is_empty() || unit.eq_ignore_ascii_case(UNIT_NONE)
    }

    /// External certification ("Verband") that grants the top score without
    /// a measured value.
    pub fn is_association_shortcut(&self) -> bool {
        self.is_unmeasured()
            && self
                .verband
                .as_deref()
                .is_some_and(|v| !v.trim().is_empty())
    }

    /// Name/category signal used when no stronger swimming signal exists.
    pub fn looks_like_swimming(&self) -> bool {
        if self.category() == Some(Category::Swimming) {
            return true;
        }
        let name = self.name.to_lowercase();
        name.contains("schwimm") || name.contains("swim")
    }
}
