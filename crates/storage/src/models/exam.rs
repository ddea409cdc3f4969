use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub exam_id: Uuid,
    pub name: String,
    pub year: i32,
    pub exam_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}
