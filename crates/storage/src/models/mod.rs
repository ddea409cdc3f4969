mod category;
mod discipline;
mod exam;
mod exam_participant;
mod exam_result;
mod gender;
mod level;
mod participant;
mod requirement;
mod swimming_proof;

pub use category::{Category, UnknownCategory};
pub use discipline::{Direction, Discipline, UNIT_NONE};
pub use exam::Exam;
pub use exam_participant::ExamParticipant;
pub use exam_result::{ExamResult, MAX_VALUE, VALUE_SCALE, storable_value};
pub use gender::Gender;
pub use level::{Level, Medal};
pub use participant::Participant;
pub use requirement::{Requirement, UNBOUNDED_MAX_AGE};
pub use swimming_proof::{ProofSource, SwimmingProof};

#[cfg(test)]
pub(crate) mod fixtures {
    pub use super::discipline::fixtures::*;
    pub use super::requirement::fixtures::*;
}
