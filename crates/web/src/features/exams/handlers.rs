use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::exam_participant::{EnrollRequest, RecomputeResponse},
    models::ExamParticipant,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/exams/{exam_id}/participants",
    params(
        ("exam_id" = Uuid, Path, description = "Exam ID")
    ),
    request_body = EnrollRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Participant enrolled", body = ExamParticipant),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam or participant not found"),
        (status = 409, description = "Participant already enrolled")
    ),
    tag = "exams"
)]
pub async fn enroll(
    State(db): State<Database>,
    Path(exam_id): Path<Uuid>,
    Json(req): Json<EnrollRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let enrollment = services::enroll(db.pool(), exam_id, req.participant_id).await?;

    Ok((StatusCode::CREATED, Json(enrollment)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/exams/{exam_id}/recompute",
    params(
        ("exam_id" = Uuid, Path, description = "Exam ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rollups recomputed", body = RecomputeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam not found")
    ),
    tag = "admin"
)]
pub async fn recompute_exam(
    State(db): State<Database>,
    Path(exam_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let recomputed_count = services::recompute_exam(db.pool(), exam_id).await?;

    Ok(Json(RecomputeResponse { recomputed_count }).into_response())
}
