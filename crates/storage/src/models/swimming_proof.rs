use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

const DISCIPLINE_PREFIX: &str = "DISCIPLINE:";

/// Evidence that the swimming requirement is met.
///
/// Proofs belong to the participant, not to an exam, and stay valid across
/// exam years until `valid_until`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SwimmingProof {
    pub proof_id: Uuid,
    pub participant_id: Uuid,
    pub confirmed_at: NaiveDate,
    pub valid_until: NaiveDate,
    pub source: String,
    pub exam_year: i32,
}

impl SwimmingProof {
    pub fn source(&self) -> ProofSource {
        ProofSource::parse(&self.source)
    }

    pub fn is_owned_by(&self, discipline_id: Uuid) -> bool {
        self.source() == ProofSource::Discipline(discipline_id)
    }

    /// Counts for the given exam year: confirmed in that year, or still valid.
    pub fn counts_for(&self, exam_year: i32, today: NaiveDate) -> bool {
        self.exam_year == exam_year || self.valid_until >= today
    }
}

/// Where a proof came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofSource {
    /// Derived from the result of a discipline.
    Discipline(Uuid),
    /// Entered by hand, e.g. "Schwimmabzeichen Bronze".
    Manual(String),
}

impl ProofSource {
    pub fn parse(raw: &str) -> ProofSource {
        raw.strip_prefix(DISCIPLINE_PREFIX)
            .and_then(|id| Uuid::parse_str(id.trim()).ok())
            .map(ProofSource::Discipline)
            .unwrap_or_else(|| ProofSource::Manual(raw.to_string()))
    }

    pub fn discipline_id(&self) -> Option<Uuid> {
        match self {
            ProofSource::Discipline(id) => Some(*id),
            ProofSource::Manual(_) => None,
        }
    }
}

impl fmt::Display for ProofSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofSource::Discipline(id) => write!(f, "{DISCIPLINE_PREFIX}{id}"),
            ProofSource::Manual(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(
            ProofSource::parse(&format!("DISCIPLINE:{id}")),
            ProofSource::Discipline(id)
        );
        assert_eq!(
            ProofSource::parse("Schwimmabzeichen Silber"),
            ProofSource::Manual("Schwimmabzeichen Silber".to_string())
        );
        // A malformed id is kept as manual text rather than dropped.
        assert_eq!(
            ProofSource::parse("DISCIPLINE:abc"),
            ProofSource::Manual("DISCIPLINE:abc".to_string())
        );
    }

    #[test]
    fn test_source_display_matches_parse() {
        let source = ProofSource::Discipline(Uuid::new_v4());
        assert_eq!(ProofSource::parse(&source.to_string()), source);
    }

    #[test]
    fn test_counts_for_year_or_validity() {
        let proof = SwimmingProof {
            proof_id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            confirmed_at: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            source: "manual".to_string(),
            exam_year: 2021,
        };
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(proof.counts_for(2021, today));
        assert!(!proof.counts_for(2025, today));
        assert!(proof.counts_for(2025, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
    }
}
