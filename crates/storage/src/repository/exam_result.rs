use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::ExamResult;
use crate::services::scoring::Score;

const RESULT_COLUMNS: &str =
    "result_id, exam_participant_id, discipline_id, value, points, level, updated_at";

pub struct ExamResultRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ExamResultRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for(&mut self, exam_participant_id: Uuid) -> Result<Vec<ExamResult>> {
        let results = sqlx::query_as::<_, ExamResult>(&format!(
            "SELECT {RESULT_COLUMNS} FROM exam_results WHERE exam_participant_id = $1"
        ))
        .bind(exam_participant_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(results)
    }

    pub async fn find(&mut self, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<Option<ExamResult>> {
        let result = sqlx::query_as::<_, ExamResult>(&format!(
            "SELECT {RESULT_COLUMNS} FROM exam_results WHERE exam_participant_id = $1 AND discipline_id = $2"
        ))
        .bind(exam_participant_id)
        .bind(discipline_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(result)
    }

    pub async fn upsert(
        &mut self,
        exam_participant_id: Uuid,
        discipline_id: Uuid,
        value: Option<Decimal>,
        score: Score,
    ) -> Result<ExamResult> {
        let result = sqlx::query_as::<_, ExamResult>(&format!(
            r#"
            INSERT INTO exam_results (exam_participant_id, discipline_id, value, points, level)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (exam_participant_id, discipline_id)
            DO UPDATE SET
                value = EXCLUDED.value,
                points = EXCLUDED.points,
                level = EXCLUDED.level,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {RESULT_COLUMNS}
            "#
        ))
        .bind(exam_participant_id)
        .bind(discipline_id)
        .bind(value)
        .bind(score.points)
        .bind(score.level.label())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(result)
    }

    /// Returns whether a row was removed
    pub async fn delete(&mut self, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<bool> {
        let outcome = sqlx::query(
            "DELETE FROM exam_results WHERE exam_participant_id = $1 AND discipline_id = $2",
        )
        .bind(exam_participant_id)
        .bind(discipline_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    /// Reset value and points while keeping the discipline selected
    pub async fn zero(&mut self, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exam_results
            SET value = NULL, points = 0, level = 'none', updated_at = CURRENT_TIMESTAMP
            WHERE exam_participant_id = $1 AND discipline_id = $2
            "#,
        )
        .bind(exam_participant_id)
        .bind(discipline_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }
}
