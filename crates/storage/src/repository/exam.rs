use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Exam;

pub struct ExamRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ExamRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Exam> {
        sqlx::query_as::<_, Exam>(
            r#"
            SELECT exam_id, name, year, exam_date, created_at
            FROM exams
            WHERE exam_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::not_found(format!("exam {id}")))
    }
}
