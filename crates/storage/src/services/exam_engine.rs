use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::dto::exam_participant::{CategoryScore, ResultResponse, SummaryResponse};
use crate::error::{Result, StorageError};
use crate::models::{
    Category, Discipline, Exam, ExamParticipant, ExamResult, Gender, Level, MAX_VALUE, Participant, ProofSource,
    Requirement, storable_value,
};
use crate::repository::discipline::DisciplineRepository;
use crate::repository::exam::ExamRepository;
use crate::repository::exam_participant::ExamParticipantRepository;
use crate::repository::exam_result::ExamResultRepository;
use crate::repository::participant::ParticipantRepository;
use crate::repository::requirement::RequirementRepository;
use crate::repository::swimming_proof::SwimmingProofRepository;

use super::scoring::{self, Score};
use super::selection::plan_retirement;
use super::summary::{relevant_proof, summarize};
use super::swimming::{
    ProofAction, ProofDraft, ProofState, plan_removal, plan_transition, swimming_relevance, validity_end,
    withdrawn_proof,
};

/// Exam participant loaded for one unit of work.
struct ExamContext {
    exam_participant: ExamParticipant,
    exam: Exam,
    participant: Participant,
    gender: Gender,
}

impl ExamContext {
    fn id(&self) -> Uuid {
        self.exam_participant.exam_participant_id
    }

    fn year(&self) -> i32 {
        self.exam.year
    }

    fn age(&self) -> i32 {
        self.exam_participant.age
    }
}

/// Runs result and proof mutations through scoring, the swimming proof
/// lifecycle and the summary recompute.
///
/// Every mutation runs in one transaction that ends with persisting the
/// recomputed rollup; a rejected operation leaves nothing behind.
pub struct ExamEngine<'a> {
    pool: &'a PgPool,
    today: NaiveDate,
}

impl<'a> ExamEngine<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self::with_today(pool, chrono::Local::now().date_naive())
    }

    pub fn with_today(pool: &'a PgPool, today: NaiveDate) -> Self {
        Self { pool, today }
    }

    /// Enroll a participant, fixing their age for the exam year
    pub async fn enroll(&self, exam_id: Uuid, participant_id: Uuid) -> Result<ExamParticipant> {
        let mut tx = self.pool.begin().await?;

        let exam = ExamRepository::new(&mut tx).find_by_id(exam_id).await?;
        let participant = ParticipantRepository::new(&mut tx).find_by_id(participant_id).await?;
        let age = participant.age_in(exam.year);

        let enrolled = ExamParticipantRepository::new(&mut tx)
            .create(exam_id, participant_id, age)
            .await?;
        tx.commit().await?;

        info!(
            exam_participant_id = %enrolled.exam_participant_id,
            age, "Participant enrolled in exam {}", exam.name
        );
        Ok(enrolled)
    }

    /// Current rollup without writing anything
    pub async fn summary(&self, exam_participant_id: Uuid) -> Result<SummaryResponse> {
        let mut conn = self.pool.acquire().await?;
        let ctx = Self::load_context(&mut conn, exam_participant_id, false).await?;
        self.build_summary(&mut conn, &ctx).await
    }

    /// Recompute and persist the rollup of one exam participant
    pub async fn sync(&self, exam_participant_id: Uuid) -> Result<SummaryResponse> {
        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;
        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;
        Ok(summary)
    }

    /// Recompute every participant of an exam, one transaction each
    pub async fn recompute_exam(&self, exam_id: Uuid) -> Result<u64> {
        let ids = {
            let mut conn = self.pool.acquire().await?;
            ExamRepository::new(&mut conn).find_by_id(exam_id).await?;
            ExamParticipantRepository::new(&mut conn)
                .list_ids_for_exam(exam_id)
                .await?
        };

        let mut count = 0u64;
        for id in ids {
            self.sync(id).await?;
            count += 1;
        }

        info!(%exam_id, count, "Recomputed exam rollups");
        Ok(count)
    }

    /// Select the active discipline of a category, or none.
    ///
    /// Other results in the category are removed. A newly selected discipline
    /// gets an empty result, which association disciplines already score.
    pub async fn change_discipline(
        &self,
        exam_participant_id: Uuid,
        category: Category,
        discipline_id: Option<Uuid>,
    ) -> Result<ResultResponse> {
        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;

        let selected = match discipline_id {
            Some(id) => Some(DisciplineRepository::new(&mut tx).find_by_id(id).await?),
            None => None,
        };
        if let Some(discipline) = &selected {
            if discipline.category() != Some(category) {
                return Err(StorageError::InvalidState(format!(
                    "'{}' does not belong to category {}",
                    discipline.name, category
                )));
            }
        }

        self.retire_category(&mut tx, &ctx, category, discipline_id)
            .await?;

        let score = match &selected {
            Some(discipline) => {
                let existing = ExamResultRepository::new(&mut tx)
                    .find(ctx.id(), discipline.discipline_id)
                    .await?;
                let value = existing.and_then(|r| r.value);
                self.apply_value(&mut tx, &ctx, discipline, value).await?
            }
            None => Score::ZERO,
        };

        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;

        Ok(ResultResponse {
            points: score.points,
            level: score.level,
            summary,
        })
    }

    /// Enter, change or clear (`None`) the measured value of a discipline
    pub async fn set_result_value(
        &self,
        exam_participant_id: Uuid,
        discipline_id: Uuid,
        value: Option<Decimal>,
    ) -> Result<ResultResponse> {
        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;
        let discipline = DisciplineRepository::new(&mut tx)
            .find_by_id(discipline_id)
            .await?;

        let score = if value.is_none() && !discipline.is_association_shortcut() {
            self.retire(&mut tx, &ctx, &[discipline_id]).await?;
            Score::ZERO
        } else {
            if let Some(category) = discipline.category() {
                self.retire_category(&mut tx, &ctx, category, Some(discipline_id))
                    .await?;
            }
            self.apply_value(&mut tx, &ctx, &discipline, value).await?
        };

        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;

        debug!(%exam_participant_id, %discipline_id, points = score.points, "Result saved");
        Ok(ResultResponse {
            points: score.points,
            level: score.level,
            summary,
        })
    }

    /// Remove the result of a discipline
    pub async fn clear_result(&self, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<ResultResponse> {
        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;
        let discipline = DisciplineRepository::new(&mut tx)
            .find_by_id(discipline_id)
            .await?;

        self.retire(&mut tx, &ctx, &[discipline.discipline_id])
            .await?;

        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;

        Ok(ResultResponse {
            points: 0,
            level: Level::None,
            summary,
        })
    }

    /// Confirm the swimming proof of the exam year through a discipline.
    ///
    /// Association disciplines are recorded as a result (and score gold);
    /// any other swimming-relevant discipline attributes the proof directly.
    /// A proof from another source is left as it is.
    pub async fn add_proof(&self, exam_participant_id: Uuid, discipline_id: Uuid) -> Result<ResultResponse> {
        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;
        let discipline = DisciplineRepository::new(&mut tx)
            .find_by_id(discipline_id)
            .await?;
        let requirement = self.lookup(&mut tx, &ctx, &discipline).await?;
        let current = SwimmingProofRepository::new(&mut tx)
            .find_for_year(ctx.participant.participant_id, ctx.year())
            .await?;

        if swimming_relevance(&discipline, requirement.as_ref(), current.as_ref()).is_none() {
            return Err(StorageError::InvalidState(format!(
                "'{}' does not count as a swimming proof",
                discipline.name
            )));
        }

        let score = if discipline.is_association_shortcut() {
            if let Some(category) = discipline.category() {
                self.retire_category(&mut tx, &ctx, category, Some(discipline_id))
                    .await?;
            }
            self.apply_value(&mut tx, &ctx, &discipline, None).await?
        } else {
            let state = ProofState::of(current.as_ref(), discipline_id);
            let action = plan_transition(state, discipline_id, true, ctx.year(), ctx.age(), self.today);
            self.execute_proof_action(&mut tx, &ctx, action).await?;
            ExamResultRepository::new(&mut tx)
                .find(ctx.id(), discipline_id)
                .await?
                .map(|r| score_of(&r))
                .unwrap_or(Score::ZERO)
        };

        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;

        Ok(ResultResponse {
            points: score.points,
            level: score.level,
            summary,
        })
    }

    /// Record a hand-entered proof for the exam year, replacing whatever
    /// proof that year had
    pub async fn add_manual_proof(
        &self,
        exam_participant_id: Uuid,
        source: &str,
        confirmed_at: Option<NaiveDate>,
    ) -> Result<ResultResponse> {
        let source = source.trim();
        if source.is_empty() {
            return Err(StorageError::InvalidState("Proof source must not be empty".to_string()));
        }
        if ProofSource::parse(source).discipline_id().is_some() {
            return Err(StorageError::InvalidState(
                "A manual proof source cannot reference a discipline".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;

        let draft = ProofDraft {
            confirmed_at: confirmed_at.unwrap_or(self.today),
            valid_until: validity_end(ctx.year(), ctx.age()),
            source: ProofSource::Manual(source.to_string()),
            exam_year: ctx.year(),
        };
        self.execute_proof_action(&mut tx, &ctx, ProofAction::Upsert(draft))
            .await?;

        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;

        Ok(ResultResponse {
            points: 0,
            level: Level::None,
            summary,
        })
    }

    /// Remove the proof of the exam year, subject to the removal rules
    pub async fn remove_proof(&self, exam_participant_id: Uuid) -> Result<ResultResponse> {
        let mut tx = self.pool.begin().await?;
        let ctx = Self::load_context(&mut tx, exam_participant_id, true).await?;
        let participant_id = ctx.participant.participant_id;

        let proof = SwimmingProofRepository::new(&mut tx)
            .find_for_year(participant_id, ctx.year())
            .await?
            .ok_or_else(|| StorageError::not_found(format!("swimming proof for exam year {}", ctx.year())))?;

        let (owner, owner_points) = match proof.source().discipline_id() {
            Some(discipline_id) => {
                let owner = DisciplineRepository::new(&mut tx)
                    .find_optional(discipline_id)
                    .await?;
                let points = ExamResultRepository::new(&mut tx)
                    .find(ctx.id(), discipline_id)
                    .await?
                    .map_or(0, |r| r.points);
                (owner, points)
            }
            None => (None, 0),
        };
        let proofs = SwimmingProofRepository::new(&mut tx)
            .list_for_participant(participant_id)
            .await?;

        let removal = plan_removal(&proof, owner.as_ref(), owner_points, &proofs, ctx.year(), self.today)
            .inspect_err(|e| info!(%exam_participant_id, "Swimming proof removal refused: {e}"))?;

        SwimmingProofRepository::new(&mut tx)
            .delete(removal.proof_id)
            .await?;
        if let Some(discipline_id) = removal.zero_result_of {
            ExamResultRepository::new(&mut tx)
                .zero(ctx.id(), discipline_id)
                .await?;
        }
        info!(%exam_participant_id, proof_id = %removal.proof_id, "Swimming proof removed");

        let summary = self.sync_in(&mut tx, &ctx).await?;
        tx.commit().await?;

        Ok(ResultResponse {
            points: 0,
            level: Level::None,
            summary,
        })
    }

    async fn load_context(conn: &mut PgConnection, exam_participant_id: Uuid, lock: bool) -> Result<ExamContext> {
        let exam_participant = if lock {
            ExamParticipantRepository::new(conn)
                .lock_by_id(exam_participant_id)
                .await?
        } else {
            ExamParticipantRepository::new(conn)
                .find_by_id(exam_participant_id)
                .await?
        };
        let exam = ExamRepository::new(conn)
            .find_by_id(exam_participant.exam_id)
            .await?;
        let participant = ParticipantRepository::new(conn)
            .find_by_id(exam_participant.participant_id)
            .await?;
        let gender = participant.gender();

        Ok(ExamContext {
            exam_participant,
            exam,
            participant,
            gender,
        })
    }

    async fn lookup(
        &self,
        conn: &mut PgConnection,
        ctx: &ExamContext,
        discipline: &Discipline,
    ) -> Result<Option<Requirement>> {
        RequirementRepository::new(conn)
            .find(discipline.discipline_id, ctx.year(), ctx.gender, ctx.age())
            .await
    }

    /// Score a value in its stored precision, store the result and let the
    /// proof follow it
    async fn apply_value(
        &self,
        conn: &mut PgConnection,
        ctx: &ExamContext,
        discipline: &Discipline,
        value: Option<Decimal>,
    ) -> Result<Score> {
        let value = value
            .map(|v| {
                storable_value(v).ok_or_else(|| {
                    StorageError::InvalidState(format!("Value {v} is out of range (max {MAX_VALUE})"))
                })
            })
            .transpose()?;
        let requirement = self.lookup(conn, ctx, discipline).await?;
        let score = scoring::score(discipline, value, requirement.as_ref());

        ExamResultRepository::new(conn)
            .upsert(ctx.id(), discipline.discipline_id, value, score)
            .await?;
        self.follow_proof(conn, ctx, discipline, requirement.as_ref(), score.points > 0)
            .await?;

        Ok(score)
    }

    /// Delete the results of `discipline_ids` and withdraw a proof one of
    /// them produced
    async fn retire(&self, conn: &mut PgConnection, ctx: &ExamContext, discipline_ids: &[Uuid]) -> Result<()> {
        for discipline_id in discipline_ids {
            let removed = ExamResultRepository::new(conn)
                .delete(ctx.id(), *discipline_id)
                .await?;
            if removed {
                debug!(exam_participant_id = %ctx.id(), %discipline_id, "Result removed");
            }
        }

        let current = SwimmingProofRepository::new(conn)
            .find_for_year(ctx.participant.participant_id, ctx.year())
            .await?;
        match withdrawn_proof(current.as_ref(), discipline_ids) {
            Some(proof_id) => {
                self.execute_proof_action(conn, ctx, ProofAction::Delete(proof_id))
                    .await
            }
            None => Ok(()),
        }
    }

    /// Retire every result of `category` except the one for `keep`
    async fn retire_category(
        &self,
        conn: &mut PgConnection,
        ctx: &ExamContext,
        category: Category,
        keep: Option<Uuid>,
    ) -> Result<()> {
        let with_results = DisciplineRepository::new(conn)
            .list_for_exam_participant(ctx.id())
            .await?;
        let retired = plan_retirement(&with_results, category, keep);
        if retired.is_empty() {
            return Ok(());
        }

        self.retire(conn, ctx, &retired).await
    }

    async fn follow_proof(
        &self,
        conn: &mut PgConnection,
        ctx: &ExamContext,
        discipline: &Discipline,
        requirement: Option<&Requirement>,
        passed: bool,
    ) -> Result<()> {
        let current = SwimmingProofRepository::new(conn)
            .find_for_year(ctx.participant.participant_id, ctx.year())
            .await?;

        let Some(signal) = swimming_relevance(discipline, requirement, current.as_ref()) else {
            return Ok(());
        };

        let state = ProofState::of(current.as_ref(), discipline.discipline_id);
        let action = plan_transition(state, discipline.discipline_id, passed, ctx.year(), ctx.age(), self.today);
        debug!(discipline = %discipline.name, ?signal, ?state, ?action, "Swimming proof transition");

        self.execute_proof_action(conn, ctx, action).await
    }

    async fn execute_proof_action(&self, conn: &mut PgConnection, ctx: &ExamContext, action: ProofAction) -> Result<()> {
        let participant_id = ctx.participant.participant_id;
        match action {
            ProofAction::Keep => {}
            ProofAction::Upsert(draft) => {
                let proof = SwimmingProofRepository::new(conn)
                    .upsert(participant_id, &draft)
                    .await?;
                info!(
                    %participant_id,
                    exam_year = proof.exam_year,
                    valid_until = %proof.valid_until,
                    source = %proof.source,
                    "Swimming proof recorded"
                );
            }
            ProofAction::Delete(proof_id) => {
                SwimmingProofRepository::new(conn).delete(proof_id).await?;
                info!(%participant_id, %proof_id, "Swimming proof withdrawn");
            }
        }
        Ok(())
    }

    /// Recompute the rollup and write it in the caller's transaction
    async fn sync_in(&self, conn: &mut PgConnection, ctx: &ExamContext) -> Result<SummaryResponse> {
        let summary = self.build_summary(conn, ctx).await?;
        ExamParticipantRepository::new(conn)
            .update_rollup(ctx.id(), summary.total, summary.medal)
            .await?;

        debug!(
            exam_participant_id = %ctx.id(),
            total = summary.total,
            medal = %summary.medal,
            "Rollup synced"
        );
        Ok(summary)
    }

    async fn build_summary(&self, conn: &mut PgConnection, ctx: &ExamContext) -> Result<SummaryResponse> {
        let results = ExamResultRepository::new(conn).list_for(ctx.id()).await?;
        let disciplines: HashMap<Uuid, Discipline> = DisciplineRepository::new(conn)
            .list_for_exam_participant(ctx.id())
            .await?
            .into_iter()
            .map(|d| (d.discipline_id, d))
            .collect();
        let proofs = SwimmingProofRepository::new(conn)
            .list_for_participant(ctx.participant.participant_id)
            .await?;

        let category_points: Vec<_> = results
            .iter()
            .map(|r| {
                let category = disciplines.get(&r.discipline_id).and_then(Discipline::category);
                (category, r.points)
            })
            .collect();
        let summary = summarize(&category_points, &proofs, ctx.year(), self.today);

        let proof = relevant_proof(&proofs, ctx.year(), self.today);
        let provenance_label = match proof.map(|p| p.source()) {
            Some(ProofSource::Discipline(id)) => match disciplines.get(&id) {
                Some(d) => Some(d.name.clone()),
                None => DisciplineRepository::new(conn)
                    .find_optional(id)
                    .await?
                    .map(|d| d.name),
            },
            Some(ProofSource::Manual(text)) => Some(text),
            None => None,
        };

        let categories = Category::FITNESS
            .iter()
            .chain(std::iter::once(&Category::Swimming))
            .map(|category| category_score(*category, &results, &disciplines))
            .collect();

        Ok(SummaryResponse {
            exam_participant_id: ctx.id(),
            total: summary.total,
            medal: summary.medal,
            filled_categories: summary.filled_categories,
            has_swimming: summary.has_swimming,
            provenance_label,
            expiry_year: proof.map(|p| p.valid_until.year()),
            categories,
        })
    }
}

fn score_of(result: &ExamResult) -> Score {
    Score {
        points: result.points,
        level: Level::from_label(&result.level),
    }
}

/// Best result of a category for display
fn category_score(category: Category, results: &[ExamResult], disciplines: &HashMap<Uuid, Discipline>) -> CategoryScore {
    let best = results
        .iter()
        .filter_map(|r| disciplines.get(&r.discipline_id).map(|d| (r, d)))
        .filter(|(_, d)| d.category() == Some(category))
        .max_by_key(|(r, _)| r.points);

    match best {
        Some((result, discipline)) => CategoryScore {
            category,
            discipline_id: Some(discipline.discipline_id),
            discipline_name: Some(discipline.name.clone()),
            value: result.value,
            points: result.points,
            level: Level::from_label(&result.level),
        },
        None => CategoryScore {
            category,
            discipline_id: None,
            discipline_name: None,
            value: None,
            points: 0,
            level: Level::None,
        },
    }
}
