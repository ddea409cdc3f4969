pub mod discipline;
pub mod exam;
pub mod exam_participant;
pub mod exam_result;
pub mod participant;
pub mod requirement;
pub mod swimming_proof;
