pub mod catalog;
pub mod exam_participants;
pub mod exams;
