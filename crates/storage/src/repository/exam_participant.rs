use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{ExamParticipant, Medal};

const EXAM_PARTICIPANT_COLUMNS: &str =
    "exam_participant_id, exam_id, participant_id, age, total_points, final_medal";

pub struct ExamParticipantRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ExamParticipantRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<ExamParticipant> {
        sqlx::query_as::<_, ExamParticipant>(&format!(
            "SELECT {EXAM_PARTICIPANT_COLUMNS} FROM exam_participants WHERE exam_participant_id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::not_found(format!("exam participant {id}")))
    }

    /// Load and row-lock an exam participant for the rest of the transaction
    pub async fn lock_by_id(&mut self, id: Uuid) -> Result<ExamParticipant> {
        sqlx::query_as::<_, ExamParticipant>(&format!(
            "SELECT {EXAM_PARTICIPANT_COLUMNS} FROM exam_participants WHERE exam_participant_id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::not_found(format!("exam participant {id}")))
    }

    pub async fn list_ids_for_exam(&mut self, exam_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT exam_participant_id FROM exam_participants WHERE exam_id = $1",
        )
        .bind(exam_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(ids)
    }

    pub async fn create(&mut self, exam_id: Uuid, participant_id: Uuid, age: i32) -> Result<ExamParticipant> {
        sqlx::query_as::<_, ExamParticipant>(&format!(
            r#"
            INSERT INTO exam_participants (exam_id, participant_id, age)
            VALUES ($1, $2, $3)
            RETURNING {EXAM_PARTICIPANT_COLUMNS}
            "#
        ))
        .bind(exam_id)
        .bind(participant_id)
        .bind(age)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(enrollment_error)
    }

    /// Store the recomputed rollup
    pub async fn update_rollup(&mut self, id: Uuid, total_points: i32, medal: Medal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exam_participants
            SET total_points = $1, final_medal = $2
            WHERE exam_participant_id = $3
            "#,
        )
        .bind(total_points)
        .bind(medal.as_str())
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }
}

/// Enrollment conflicts surface as domain errors: a second enrollment is a
/// constraint violation, a vanished exam or participant is not found.
fn enrollment_error(e: sqlx::Error) -> StorageError {
    let err = StorageError::from(e);
    if err.is_unique_violation() {
        return StorageError::ConstraintViolation("Participant is already enrolled in this exam".to_string());
    }
    if err.is_foreign_key_violation() {
        return StorageError::not_found("exam or participant for enrollment");
    }
    err
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("postgres error {code}")]
    struct PgCode {
        code: &'static str,
    }

    impl DatabaseError for PgCode {
        fn message(&self) -> &str {
            "postgres error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                "23503" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgCode { code }))
    }

    #[test]
    fn test_duplicate_enrollment_is_constraint_violation() {
        assert!(matches!(
            enrollment_error(db_error("23505")),
            StorageError::ConstraintViolation(_)
        ));
    }

    #[test]
    fn test_enrollment_of_missing_row_is_not_found() {
        assert!(matches!(enrollment_error(db_error("23503")), StorageError::NotFound(_)));
    }

    #[test]
    fn test_other_enrollment_errors_pass_through() {
        assert!(matches!(
            enrollment_error(db_error("23514")),
            StorageError::Database(_)
        ));
        assert!(matches!(
            enrollment_error(sqlx::Error::PoolTimedOut),
            StorageError::Database(sqlx::Error::PoolTimedOut)
        ));
    }
}
