use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Enrollment of a participant in one exam, carrying the cached rollup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamParticipant {
    pub exam_participant_id: Uuid,
    pub exam_id: Uuid,
    pub participant_id: Uuid,
    pub age: i32,
    pub total_points: i32,
    pub final_medal: String,
}
