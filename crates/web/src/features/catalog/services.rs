use sqlx::PgPool;
use storage::{
    dto::catalog::{DisciplineResponse, ScorePreviewRequest, ScorePreviewResponse},
    error::{Result, StorageError},
    models::{Category, Gender, Requirement, storable_value},
    repository::{discipline::DisciplineRepository, requirement::RequirementRepository},
    services::scoring,
};
use uuid::Uuid;

/// List the discipline catalog, optionally for one category
pub async fn list_disciplines(pool: &PgPool, category: Option<Category>) -> Result<Vec<DisciplineResponse>> {
    let mut conn = pool.acquire().await?;
    let disciplines = DisciplineRepository::new(&mut conn).list().await?;

    Ok(disciplines
        .into_iter()
        .filter(|d| category.is_none() || d.category() == category)
        .map(DisciplineResponse::from)
        .collect())
}

/// Find the requirement row that applies to a participant profile
pub async fn lookup_requirement(
    pool: &PgPool,
    discipline_id: Uuid,
    year: i32,
    gender: Option<&str>,
    age: i32,
) -> Result<Requirement> {
    let mut conn = pool.acquire().await?;
    let gender = Gender::normalize(gender);

    RequirementRepository::new(&mut conn)
        .find(discipline_id, year, gender, age)
        .await?
        .ok_or_else(|| {
            StorageError::not_found(format!(
                "requirement for discipline {discipline_id}, {year}, {gender}, age {age}"
            ))
        })
}

/// Score a value without storing anything
pub async fn preview_score(pool: &PgPool, req: &ScorePreviewRequest) -> Result<ScorePreviewResponse> {
    let mut conn = pool.acquire().await?;
    let discipline = DisciplineRepository::new(&mut conn)
        .find_by_id(req.discipline_id)
        .await?;
    let requirement = RequirementRepository::new(&mut conn)
        .find(
            req.discipline_id,
            req.year,
            Gender::normalize(req.gender.as_deref()),
            req.age,
        )
        .await?;

    let value = req.value.and_then(storable_value);
    let score = scoring::score(&discipline, value, requirement.as_ref());

    Ok(ScorePreviewResponse {
        points: score.points,
        level: score.level,
        requirement_id: requirement.map(|r| r.requirement_id),
    })
}
