use super::models::{DisciplineData, RequirementTable};
use crate::{ImporterError, Result};
use sqlx::{PgConnection, PgPool};
use storage::{
    models::{Category, Direction, Gender},
    repository::{discipline::DisciplineRepository, requirement::RequirementRepository},
};
use tracing::{debug, info};

/// Counts of rows written by one import
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub disciplines: usize,
    pub requirements: usize,
}

pub struct CanonicalTransformer<'a> {
    pool: &'a PgPool,
}

impl<'a> CanonicalTransformer<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert every discipline and requirement row of the table in one transaction
    pub async fn import_to_database(&self, table: &RequirementTable) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;
        let mut summary = ImportSummary::default();

        for discipline in &table.disciplines {
            summary.requirements += self
                .import_discipline(discipline, table.year, &mut tx)
                .await?;
            summary.disciplines += 1;
        }

        tx.commit().await?;

        info!(
            year = table.year,
            disciplines = summary.disciplines,
            requirements = summary.requirements,
            "Requirement table imported"
        );
        Ok(summary)
    }

    async fn import_discipline(
        &self,
        discipline: &DisciplineData,
        year: i32,
        conn: &mut PgConnection,
    ) -> Result<usize> {
        let category = discipline.category.parse::<Category>().map_err(|e| {
            ImporterError::TransformationError(format!("{}: {}", discipline.name, e))
        })?;

        let stored = DisciplineRepository::new(conn)
            .upsert(
                discipline.name.trim(),
                category.as_str(),
                discipline.unit_or_none(),
                discipline.direction == Direction::GreaterIsBetter,
                discipline
                    .verband
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty()),
            )
            .await?;

        let mut repo = RequirementRepository::new(conn);
        for row in &discipline.requirements {
            let gender = Gender::recognize(&row.gender).ok_or_else(|| {
                ImporterError::TransformationError(format!(
                    "{}: invalid gender '{}'",
                    discipline.name, row.gender
                ))
            })?;

            repo.upsert(
                stored.discipline_id,
                year,
                gender,
                row.age_min,
                row.age_max,
                row.thresholds(),
                row.counts_as_swimming,
            )
            .await?;
        }

        debug!(
            discipline = %stored.name,
            rows = discipline.requirements.len(),
            "Discipline imported"
        );
        Ok(discipline.requirements.len())
    }
}
