use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Discipline;

const DISCIPLINE_COLUMNS: &str =
    "discipline_id, name, category, unit, greater_is_better, verband, created_at";

/// Read/write access to the discipline catalog
pub struct DisciplineRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> DisciplineRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&mut self) -> Result<Vec<Discipline>> {
        let disciplines = sqlx::query_as::<_, Discipline>(&format!(
            "SELECT {DISCIPLINE_COLUMNS} FROM disciplines ORDER BY category, name"
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(disciplines)
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Discipline> {
        self.find_optional(id)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("discipline {id}")))
    }

    pub async fn find_optional(&mut self, id: Uuid) -> Result<Option<Discipline>> {
        let discipline = sqlx::query_as::<_, Discipline>(&format!(
            "SELECT {DISCIPLINE_COLUMNS} FROM disciplines WHERE discipline_id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(discipline)
    }

    /// Disciplines referenced by the results of an exam participant
    pub async fn list_for_exam_participant(&mut self, exam_participant_id: Uuid) -> Result<Vec<Discipline>> {
        let disciplines = sqlx::query_as::<_, Discipline>(
            r#"
            SELECT d.discipline_id, d.name, d.category, d.unit, d.greater_is_better,
                   d.verband, d.created_at
            FROM disciplines d
            INNER JOIN exam_results r ON r.discipline_id = d.discipline_id
            WHERE r.exam_participant_id = $1
            "#,
        )
        .bind(exam_participant_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(disciplines)
    }

    /// Insert or update a discipline keyed by name
    pub async fn upsert(
        &mut self,
        name: &str,
        category: &str,
        unit: &str,
        greater_is_better: bool,
        verband: Option<&str>,
    ) -> Result<Discipline> {
        let discipline = sqlx::query_as::<_, Discipline>(&format!(
            r#"
            INSERT INTO disciplines (name, category, unit, greater_is_better, verband)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name)
            DO UPDATE SET
                category = EXCLUDED.category,
                unit = EXCLUDED.unit,
                greater_is_better = EXCLUDED.greater_is_better,
                verband = EXCLUDED.verband
            RETURNING {DISCIPLINE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(category)
        .bind(unit)
        .bind(greater_is_better)
        .bind(verband)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(discipline)
    }
}
