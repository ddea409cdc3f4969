use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::{
    dto::exam_participant::{ManualProofRequest, ResultResponse, SummaryResponse},
    error::Result,
    models::Category,
    services::ExamEngine,
};
use uuid::Uuid;

/// Current rollup of an exam participant
pub async fn get_summary(pool: &PgPool, exam_participant_id: Uuid) -> Result<SummaryResponse> {
    ExamEngine::new(pool).summary(exam_participant_id).await
}

/// Select or deselect the discipline of a category
pub async fn change_discipline(
    pool: &PgPool,
    exam_participant_id: Uuid,
    category: Category,
    discipline_id: Option<Uuid>,
) -> Result<ResultResponse> {
    ExamEngine::new(pool)
        .change_discipline(exam_participant_id, category, discipline_id)
        .await
}

/// Enter or clear a measured value
pub async fn set_result(
    pool: &PgPool,
    exam_participant_id: Uuid,
    discipline_id: Uuid,
    value: Option<Decimal>,
) -> Result<ResultResponse> {
    ExamEngine::new(pool)
        .set_result_value(exam_participant_id, discipline_id, value)
        .await
}

pub async fn clear_result(pool: &PgPool, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<ResultResponse> {
    ExamEngine::new(pool)
        .clear_result(exam_participant_id, discipline_id)
        .await
}

pub async fn add_proof(pool: &PgPool, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<ResultResponse> {
    ExamEngine::new(pool)
        .add_proof(exam_participant_id, discipline_id)
        .await
}

pub async fn add_manual_proof(
    pool: &PgPool,
    exam_participant_id: Uuid,
    request: &ManualProofRequest,
) -> Result<ResultResponse> {
    ExamEngine::new(pool)
        .add_manual_proof(exam_participant_id, &request.source, request.confirmed_at)
        .await
}

pub async fn remove_proof(pool: &PgPool, exam_participant_id: Uuid) -> Result<ResultResponse> {
    ExamEngine::new(pool).remove_proof(exam_participant_id).await
}
