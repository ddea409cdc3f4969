use chrono::NaiveDate;

use crate::models::{Category, Medal, SwimmingProof};

/// Rollup of an exam participant's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Best points per fitness category, in [`Category::FITNESS`] order.
    pub category_points: [i32; 4],
    pub total: i32,
    pub filled_categories: usize,
    pub has_swimming: bool,
    pub medal: Medal,
}

/// Aggregates category points and swimming presence into total and medal.
///
/// `results` are `(category, points)` pairs of the participant's results;
/// swimming results and unknown categories do not add to the total. A medal
/// requires a swimming proof and points in all four categories.
pub fn summarize(
    results: &[(Option<Category>, i32)],
    proofs: &[SwimmingProof],
    exam_year: i32,
    today: NaiveDate,
) -> Summary {
    let mut category_points = [0; 4];
    for (slot, category) in Category::FITNESS.iter().enumerate() {
        category_points[slot] = results
            .iter()
            .filter(|(c, _)| c.as_ref() == Some(category))
            .map(|(_, points)| (*points).clamp(0, 3))
            .max()
            .unwrap_or(0);
    }

    let total = category_points.iter().sum();
    let filled_categories = category_points.iter().filter(|p| **p > 0).count();
    let has_swimming = proofs.iter().any(|p| p.counts_for(exam_year, today));

    let medal = if has_swimming && filled_categories == Category::FITNESS.len() {
        Medal::for_total(total)
    } else {
        Medal::None
    };

    Summary {
        category_points,
        total,
        filled_categories,
        has_swimming,
        medal,
    }
}

/// Proof shown for an exam year: the one confirmed in that year, otherwise
/// the still-valid proof that runs the longest.
pub fn relevant_proof(proofs: &[SwimmingProof], exam_year: i32, today: NaiveDate) -> Option<&SwimmingProof> {
    proofs
        .iter()
        .find(|p| p.exam_year == exam_year)
        .or_else(|| {
            proofs
                .iter()
                .filter(|p| p.valid_until >= today)
                .max_by_key(|p| p.valid_until)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProofSource;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn proof(exam_year: i32, valid_until: NaiveDate) -> SwimmingProof {
        SwimmingProof {
            proof_id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            confirmed_at: date(exam_year, 6, 1),
            valid_until,
            source: ProofSource::Manual("Schwimmabzeichen".into()).to_string(),
            exam_year,
        }
    }

    fn all_four(points: [i32; 4]) -> Vec<(Option<Category>, i32)> {
        Category::FITNESS
            .iter()
            .zip(points)
            .map(|(c, p)| (Some(*c), p))
            .collect()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    #[test]
    fn test_three_categories_never_earn_a_medal() {
        let results = all_four([3, 3, 3, 0]);
        let s = summarize(&results, &[proof(2025, date(2029, 12, 31))], 2025, today());
        assert_eq!(s.total, 9);
        assert_eq!(s.filled_categories, 3);
        assert!(s.has_swimming);
        assert_eq!(s.medal, Medal::None);
    }

    #[test]
    fn test_missing_swimming_blocks_medal() {
        let s = summarize(&all_four([3, 3, 3, 3]), &[], 2025, today());
        assert_eq!(s.total, 12);
        assert!(!s.has_swimming);
        assert_eq!(s.medal, Medal::None);
    }

    #[test]
    fn test_medal_tiers_when_gates_pass() {
        let proofs = [proof(2025, date(2029, 12, 31))];
        assert_eq!(summarize(&all_four([3, 3, 3, 2]), &proofs, 2025, today()).medal, Medal::Gold);
        assert_eq!(summarize(&all_four([2, 2, 2, 2]), &proofs, 2025, today()).medal, Medal::Silver);
        assert_eq!(summarize(&all_four([1, 1, 1, 1]), &proofs, 2025, today()).medal, Medal::Bronze);
    }

    #[test]
    fn test_best_result_per_category_counts() {
        let mut results = all_four([1, 1, 1, 1]);
        results.push((Some(Category::Endurance), 3));
        results.push((Some(Category::Swimming), 3));
        results.push((None, 3));
        let s = summarize(&results, &[], 2025, today());
        assert_eq!(s.category_points, [3, 1, 1, 1]);
        assert_eq!(s.total, 6);
    }

    #[test]
    fn test_swimming_from_older_still_valid_proof() {
        let proofs = [proof(2022, date(2026, 12, 31))];
        assert!(summarize(&[], &proofs, 2025, today()).has_swimming);

        let expired = [proof(2020, date(2024, 12, 31))];
        assert!(!summarize(&[], &expired, 2025, today()).has_swimming);
        // Editing the year the expired proof was made for still sees it.
        assert!(summarize(&[], &expired, 2020, today()).has_swimming);
    }

    #[test]
    fn test_gating_and_range_invariants() {
        let proofs = [proof(2025, date(2029, 12, 31))];
        for a in 0..=3 {
            for b in 0..=3 {
                for c in 0..=3 {
                    for d in 0..=3 {
                        for with_proof in [true, false] {
                            let p: &[SwimmingProof] = if with_proof { &proofs } else { &[] };
                            let s = summarize(&all_four([a, b, c, d]), p, 2025, today());
                            assert!((0..=12).contains(&s.total));
                            if s.medal != Medal::None {
                                assert!(s.has_swimming && s.filled_categories == 4);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_relevant_proof_prefers_exam_year() {
        let current = proof(2025, date(2026, 12, 31));
        let longer = proof(2024, date(2030, 12, 31));
        let proofs = vec![longer.clone(), current.clone()];
        assert_eq!(relevant_proof(&proofs, 2025, today()).unwrap().proof_id, current.proof_id);
        assert_eq!(relevant_proof(&proofs, 2023, today()).unwrap().proof_id, longer.proof_id);
        assert!(relevant_proof(&[], 2025, today()).is_none());
    }
}
