//! Input records and loading
//! Candidate and job-description records arrive as JSON, one record per file.

pub mod loader;
pub mod records;
