pub mod exam_engine;
pub mod requirement_lookup;
pub mod scoring;
pub mod selection;
pub mod summary;
pub mod swimming;

pub use exam_engine::ExamEngine;
