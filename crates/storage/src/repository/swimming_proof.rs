use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::SwimmingProof;
use crate::services::swimming::ProofDraft;

const PROOF_COLUMNS: &str = "proof_id, participant_id, confirmed_at, valid_until, source, exam_year";

pub struct SwimmingProofRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> SwimmingProofRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Every proof of a participant, newest exam year first
    pub async fn list_for_participant(&mut self, participant_id: Uuid) -> Result<Vec<SwimmingProof>> {
        let proofs = sqlx::query_as::<_, SwimmingProof>(&format!(
            "SELECT {PROOF_COLUMNS} FROM swimming_proofs WHERE participant_id = $1 ORDER BY exam_year DESC"
        ))
        .bind(participant_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(proofs)
    }

    pub async fn find_for_year(&mut self, participant_id: Uuid, exam_year: i32) -> Result<Option<SwimmingProof>> {
        let proof = sqlx::query_as::<_, SwimmingProof>(&format!(
            "SELECT {PROOF_COLUMNS} FROM swimming_proofs WHERE participant_id = $1 AND exam_year = $2"
        ))
        .bind(participant_id)
        .bind(exam_year)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(proof)
    }

    /// Create or replace the participant's proof for the draft's exam year
    pub async fn upsert(&mut self, participant_id: Uuid, draft: &ProofDraft) -> Result<SwimmingProof> {
        let proof = sqlx::query_as::<_, SwimmingProof>(&format!(
            r#"
            INSERT INTO swimming_proofs (participant_id, confirmed_at, valid_until, source, exam_year)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (participant_id, exam_year)
            DO UPDATE SET
                confirmed_at = EXCLUDED.confirmed_at,
                valid_until = EXCLUDED.valid_until,
                source = EXCLUDED.source
            RETURNING {PROOF_COLUMNS}
            "#
        ))
        .bind(participant_id)
        .bind(draft.confirmed_at)
        .bind(draft.valid_until)
        .bind(draft.source.to_string())
        .bind(draft.exam_year)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(proof)
    }

    pub async fn delete(&mut self, proof_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM swimming_proofs WHERE proof_id = $1")
            .bind(proof_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }
}
