pub mod catalog;
pub mod exam_participant;
