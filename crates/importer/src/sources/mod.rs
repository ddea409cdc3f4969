pub mod canonical_file;
pub mod csv;
