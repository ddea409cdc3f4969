//! One active discipline per category.

use uuid::Uuid;

use crate::models::{Category, Discipline};

/// Disciplines whose results leave when `keep` becomes (or stays) the
/// active discipline of `category`. `keep = None` empties the category.
pub fn plan_retirement(with_results: &[Discipline], category: Category, keep: Option<Uuid>) -> Vec<Uuid> {
    with_results
        .iter()
        .filter(|d| d.category() == Some(category) && Some(d.discipline_id) != keep)
        .map(|d| d.discipline_id)
        .collect()
}
