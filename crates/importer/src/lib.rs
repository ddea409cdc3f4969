pub mod canonical;
pub mod error;
pub mod sources;
pub mod traits;

pub use error::{ImporterError, Result};
pub use traits::RequirementSource;

pub use sources::{canonical_file::CanonicalFileSource, csv::CsvSource};
