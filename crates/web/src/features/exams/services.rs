use sqlx::PgPool;
use storage::{error::Result, models::ExamParticipant, services::ExamEngine};
use uuid::Uuid;

/// Enroll a participant into an exam
pub async fn enroll(pool: &PgPool, exam_id: Uuid, participant_id: Uuid) -> Result<ExamParticipant> {
    ExamEngine::new(pool).enroll(exam_id, participant_id).await
}

/// Re-derive the rollup of every participant in an exam
pub async fn recompute_exam(pool: &PgPool, exam_id: Uuid) -> Result<u64> {
    ExamEngine::new(pool).recompute_exam(exam_id).await
}
