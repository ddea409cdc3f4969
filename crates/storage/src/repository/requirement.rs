use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Gender, Requirement};
use crate::services::requirement_lookup::find_requirement;

pub struct RequirementRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> RequirementRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// All rows of a discipline for one exam year
    pub async fn list_for(&mut self, discipline_id: Uuid, year: i32) -> Result<Vec<Requirement>> {
        let rows = sqlx::query_as::<_, Requirement>(
            r#"
            SELECT requirement_id, discipline_id, year, gender, age_min, age_max,
                   bronze, silver, gold, counts_as_swimming
            FROM requirements
            WHERE discipline_id = $1 AND year = $2
            ORDER BY gender, age_min
            "#,
        )
        .bind(discipline_id)
        .bind(year)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Requirement matching discipline, year, gender and age.
    ///
    /// Stored gender values go through the same normalization as the
    /// participant's, so legacy spellings in the table still match.
    pub async fn find(
        &mut self,
        discipline_id: Uuid,
        year: i32,
        gender: Gender,
        age: i32,
    ) -> Result<Option<Requirement>> {
        let rows = self.list_for(discipline_id, year).await?;
        Ok(find_requirement(&rows, discipline_id, year, gender, age).cloned())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        &mut self,
        discipline_id: Uuid,
        year: i32,
        gender: Gender,
        age_min: i32,
        age_max: i32,
        thresholds: [Option<Decimal>; 3],
        counts_as_swimming: bool,
    ) -> Result<Requirement> {
        let [bronze, silver, gold] = thresholds;
        let row = sqlx::query_as::<_, Requirement>(
            r#"
            INSERT INTO requirements (discipline_id, year, gender, age_min, age_max,
                                      bronze, silver, gold, counts_as_swimming)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (discipline_id, year, gender, age_min)
            DO UPDATE SET
                age_max = EXCLUDED.age_max,
                bronze = EXCLUDED.bronze,
                silver = EXCLUDED.silver,
                gold = EXCLUDED.gold,
                counts_as_swimming = EXCLUDED.counts_as_swimming
            RETURNING requirement_id, discipline_id, year, gender, age_min, age_max,
                      bronze, silver, gold, counts_as_swimming
            "#,
        )
        .bind(discipline_id)
        .bind(year)
        .bind(gender.as_str())
        .bind(age_min)
        .bind(age_max)
        .bind(bronze)
        .bind(silver)
        .bind(gold)
        .bind(counts_as_swimming)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row)
    }
}
