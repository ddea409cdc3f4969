use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Category, Direction, Discipline, Level};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisciplineResponse {
    pub discipline_id: Uuid,
    pub name: String,
    pub category: Option<Category>,
    pub unit: String,
    pub direction: Direction,
    pub verband: Option<String>,
    pub association_shortcut: bool,
}

impl From<Discipline> for DisciplineResponse {
    fn from(d: Discipline) -> Self {
        Self {
            category: d.category(),
            direction: d.direction(),
            association_shortcut: d.is_association_shortcut(),
            discipline_id: d.discipline_id,
            name: d.name,
            unit: d.unit,
            verband: d.verband,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DisciplineListParams {
    /// English or German category name
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct RequirementLookupParams {
    pub discipline_id: Uuid,
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    /// Free-form; normalized like a participant's gender
    pub gender: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ScorePreviewRequest {
    pub discipline_id: Uuid,
    #[validate(custom(function = "crate::dto::exam_participant::validate_result_value"))]
    pub value: Option<Decimal>,
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    pub gender: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScorePreviewResponse {
    pub points: i32,
    pub level: Level,
    /// Requirement row used, absent when none matched
    pub requirement_id: Option<Uuid>,
}
