//! Swimming proof lifecycle.
//!
//! A participant holds at most one proof per exam year. Proofs derived from a
//! discipline result (`DISCIPLINE:<id>`) follow that result: they are created
//! or renewed when it scores and removed when it is cleared or drops to zero.
//! Proofs from any other source are never touched by automatic transitions.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Discipline, ProofSource, Requirement, SwimmingProof};

/// Years a proof stays valid for participants who are already adults.
pub const ADULT_VALIDITY_YEARS: i32 = 4;

/// Age until which a proof obtained as a minor stays valid.
pub const MAJORITY_AGE: i32 = 18;

/// Which signal marked a discipline as swimming-relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwimmingSignal {
    /// A proof is already attributed to the discipline.
    OwnedProof,
    /// The requirement row is flagged as a swimming proof.
    RequirementFlag,
    /// Category or name of the discipline.
    DisciplineHeuristic,
}

/// Something that can vouch for a discipline counting as swimming.
pub trait SwimmingEvidence {
    fn signal(&self) -> SwimmingSignal;
    fn marks_swimming(&self, discipline: &Discipline) -> bool;
}

impl SwimmingEvidence for SwimmingProof {
    fn signal(&self) -> SwimmingSignal {
        SwimmingSignal::OwnedProof
    }

    fn marks_swimming(&self, discipline: &Discipline) -> bool {
        self.is_owned_by(discipline.discipline_id)
    }
}

impl SwimmingEvidence for Requirement {
    fn signal(&self) -> SwimmingSignal {
        SwimmingSignal::RequirementFlag
    }

    fn marks_swimming(&self, discipline: &Discipline) -> bool {
        self.discipline_id == discipline.discipline_id && self.counts_as_swimming
    }
}

impl SwimmingEvidence for Discipline {
    fn signal(&self) -> SwimmingSignal {
        SwimmingSignal::DisciplineHeuristic
    }

    fn marks_swimming(&self, discipline: &Discipline) -> bool {
        self.discipline_id == discipline.discipline_id && discipline.looks_like_swimming()
    }
}

/// Decides whether a result change on `discipline` touches swimming state.
///
/// Signals are checked in priority order: an existing proof owned by the
/// discipline, the requirement flag, then the category/name heuristic. The
/// owned-proof check comes first so a proof can always be withdrawn even if
/// the catalog metadata changed after it was created.
pub fn swimming_relevance(
    discipline: &Discipline,
    requirement: Option<&Requirement>,
    current_proof: Option<&SwimmingProof>,
) -> Option<SwimmingSignal> {
    let evidence: [Option<&dyn SwimmingEvidence>; 3] = [
        current_proof.map(|p| p as &dyn SwimmingEvidence),
        requirement.map(|r| r as &dyn SwimmingEvidence),
        Some(discipline as &dyn SwimmingEvidence),
    ];

    evidence
        .into_iter()
        .flatten()
        .find(|e| e.marks_swimming(discipline))
        .map(|e| e.signal())
}

/// Ownership of the participant's proof for the exam year being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofState {
    NoProof,
    OwnedByThisDiscipline(Uuid),
    OwnedElsewhere,
}

impl ProofState {
    pub fn of(current: Option<&SwimmingProof>, discipline_id: Uuid) -> Self {
        match current {
            None => ProofState::NoProof,
            Some(p) if p.is_owned_by(discipline_id) => ProofState::OwnedByThisDiscipline(p.proof_id),
            Some(_) => ProofState::OwnedElsewhere,
        }
    }
}

/// Proof to write for a participant and exam year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofDraft {
    pub confirmed_at: NaiveDate,
    pub valid_until: NaiveDate,
    pub source: ProofSource,
    pub exam_year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofAction {
    Keep,
    Upsert(ProofDraft),
    Delete(Uuid),
}

/// Last day a proof confirmed in `exam_year` counts.
///
/// Minors keep it until the end of the year they turn 18; adults get a fixed
/// four-year window.
pub fn validity_end(exam_year: i32, age: i32) -> NaiveDate {
    let years = if age < MAJORITY_AGE {
        MAJORITY_AGE - age
    } else {
        ADULT_VALIDITY_YEARS
    };
    NaiveDate::from_ymd_opt(exam_year + years, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Transition for a swimming-relevant result that now passes (scored above
/// zero) or no longer does (cleared or zero points).
pub fn plan_transition(
    state: ProofState,
    discipline_id: Uuid,
    passed: bool,
    exam_year: i32,
    age: i32,
    today: NaiveDate,
) -> ProofAction {
    match (state, passed) {
        (ProofState::OwnedElsewhere, _) => ProofAction::Keep,
        (_, true) => ProofAction::Upsert(ProofDraft {
            confirmed_at: today,
            valid_until: validity_end(exam_year, age),
            source: ProofSource::Discipline(discipline_id),
            exam_year,
        }),
        (ProofState::OwnedByThisDiscipline(proof_id), false) => ProofAction::Delete(proof_id),
        (ProofState::NoProof, false) => ProofAction::Keep,
    }
}

/// Proof to delete once the results of `retired` are gone.
///
/// Only a proof produced by one of the retired disciplines goes with them.
pub fn withdrawn_proof(current: Option<&SwimmingProof>, retired: &[Uuid]) -> Option<Uuid> {
    retired
        .iter()
        .find_map(|id| match ProofState::of(current, *id) {
            ProofState::OwnedByThisDiscipline(proof_id) => Some(proof_id),
            ProofState::NoProof | ProofState::OwnedElsewhere => None,
        })
}

/// Outcome of an explicit request to remove a proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRemoval {
    pub proof_id: Uuid,
    /// Discipline whose result must be zeroed together with the proof.
    pub zero_result_of: Option<Uuid>,
}

/// Checks whether the proof of the edited exam year may be removed by hand.
///
/// * Proofs derived from a scored result in an endurance or speed discipline
///   are withdrawn by clearing that result, not here.
/// * Proofs derived from other disciplines go away together with their result.
/// * Manual proofs stay while a later exam year holds a still-valid proof.
pub fn plan_removal(
    proof: &SwimmingProof,
    owner: Option<&Discipline>,
    owner_result_points: i32,
    proofs: &[SwimmingProof],
    exam_year: i32,
    today: NaiveDate,
) -> Result<ProofRemoval> {
    match proof.source() {
        ProofSource::Discipline(discipline_id) => {
            if let Some(owner) = owner {
                let foundational = owner.category().is_some_and(|c| c.is_foundational());
                if foundational && owner_result_points > 0 {
                    return Err(StorageError::InvalidState(format!(
                        "The swimming proof comes from the result in '{}'; clear that result instead",
                        owner.name
                    )));
                }
            }
            Ok(ProofRemoval {
                proof_id: proof.proof_id,
                zero_result_of: Some(discipline_id),
            })
        }
        ProofSource::Manual(_) => {
            let later = proofs
                .iter()
                .filter(|p| p.exam_year > exam_year && p.valid_until >= today)
                .max_by_key(|p| p.exam_year);
            if let Some(later) = later {
                return Err(StorageError::InvalidState(format!(
                    "A swimming proof from {} is valid until {} and applies to this exam as well",
                    later.exam_year, later.valid_until
                )));
            }
            Ok(ProofRemoval {
                proof_id: proof.proof_id,
                zero_result_of: None,
            })
        }
    }
}
