use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Participant;

pub struct ParticipantRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ParticipantRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Participant> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT participant_id, first_name, last_name, birth_year, gender, created_at
            FROM participants
            WHERE participant_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::not_found(format!("participant {id}")))
    }
}
