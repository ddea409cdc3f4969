use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::catalog::{
        DisciplineListParams, DisciplineResponse, RequirementLookupParams, ScorePreviewRequest,
        ScorePreviewResponse,
    },
    models::{Category, Requirement},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/disciplines",
    params(DisciplineListParams),
    responses(
        (status = 200, description = "Discipline catalog", body = Vec<DisciplineResponse>),
        (status = 400, description = "Unknown category")
    ),
    tag = "catalog"
)]
pub async fn list_disciplines(
    State(db): State<Database>,
    Query(params): Query<DisciplineListParams>,
) -> Result<Response, WebError> {
    let category = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let disciplines = services::list_disciplines(db.pool(), category).await?;

    Ok(Json(disciplines).into_response())
}

#[utoipa::path(
    get,
    path = "/api/requirements/lookup",
    params(RequirementLookupParams),
    responses(
        (status = 200, description = "Requirement row for the profile", body = Requirement),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "No requirement covers this profile")
    ),
    tag = "catalog"
)]
pub async fn lookup_requirement(
    State(db): State<Database>,
    Query(params): Query<RequirementLookupParams>,
) -> Result<Response, WebError> {
    params.validate()?;

    let requirement = services::lookup_requirement(
        db.pool(),
        params.discipline_id,
        params.year,
        params.gender.as_deref(),
        params.age,
    )
    .await?;

    Ok(Json(requirement).into_response())
}

#[utoipa::path(
    post,
    path = "/api/scoring/preview",
    request_body = ScorePreviewRequest,
    responses(
        (status = 200, description = "Points the value would earn", body = ScorePreviewResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Discipline not found")
    ),
    tag = "catalog"
)]
pub async fn preview_score(
    State(db): State<Database>,
    Json(payload): Json<ScorePreviewRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let response = services::preview_score(db.pool(), &payload).await?;

    Ok(Json(response).into_response())
}
