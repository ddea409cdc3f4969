use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::exam_participant::{
        AddProofRequest, ChangeDisciplineRequest, ManualProofRequest, ResultResponse,
        SetResultRequest, SummaryResponse,
    },
    models::Category,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/exam-participants/{id}/summary",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID")
    ),
    responses(
        (status = 200, description = "Current points and medal", body = SummaryResponse),
        (status = 404, description = "Exam participant not found")
    ),
    tag = "exam-participants"
)]
pub async fn get_summary(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let summary = services::get_summary(db.pool(), id).await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    put,
    path = "/api/exam-participants/{id}/categories/{category}",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID"),
        ("category" = String, Path, description = "Category name, English or German")
    ),
    request_body = ChangeDisciplineRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Discipline selection applied", body = ResultResponse),
        (status = 400, description = "Unknown category"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam participant or discipline not found"),
        (status = 422, description = "Discipline belongs to another category")
    ),
    tag = "exam-participants"
)]
pub async fn change_discipline(
    State(db): State<Database>,
    Path((id, category)): Path<(Uuid, String)>,
    Json(req): Json<ChangeDisciplineRequest>,
) -> Result<Response, WebError> {
    let category = category
        .parse::<Category>()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let response = services::change_discipline(db.pool(), id, category, req.discipline_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/exam-participants/{id}/results/{discipline_id}",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID"),
        ("discipline_id" = Uuid, Path, description = "Discipline ID")
    ),
    request_body = SetResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Result scored and saved", body = ResultResponse),
        (status = 400, description = "Value out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam participant or discipline not found")
    ),
    tag = "exam-participants"
)]
pub async fn set_result(
    State(db): State<Database>,
    Path((id, discipline_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::set_result(db.pool(), id, discipline_id, req.value).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/exam-participants/{id}/results/{discipline_id}",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID"),
        ("discipline_id" = Uuid, Path, description = "Discipline ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Result removed", body = ResultResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam participant or discipline not found")
    ),
    tag = "exam-participants"
)]
pub async fn clear_result(
    State(db): State<Database>,
    Path((id, discipline_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let response = services::clear_result(db.pool(), id, discipline_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/exam-participants/{id}/swimming-proof",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID")
    ),
    request_body = AddProofRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Swimming proof confirmed", body = ResultResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam participant or discipline not found"),
        (status = 422, description = "Discipline does not count as a swimming proof")
    ),
    tag = "swimming-proof"
)]
pub async fn add_proof(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddProofRequest>,
) -> Result<Response, WebError> {
    let response = services::add_proof(db.pool(), id, req.discipline_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/exam-participants/{id}/swimming-proof/manual",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID")
    ),
    request_body = ManualProofRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Manual swimming proof recorded", body = ResultResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Exam participant not found"),
        (status = 422, description = "Source is not a valid manual source")
    ),
    tag = "swimming-proof"
)]
pub async fn add_manual_proof(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<ManualProofRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::add_manual_proof(db.pool(), id, &req).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/exam-participants/{id}/swimming-proof",
    params(
        ("id" = Uuid, Path, description = "Exam participant ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Swimming proof removed", body = ResultResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No swimming proof for the exam year"),
        (status = 422, description = "Removal refused by the proof rules")
    ),
    tag = "swimming-proof"
)]
pub async fn remove_proof(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let response = services::remove_proof(db.pool(), id).await?;

    Ok(Json(response).into_response())
}
