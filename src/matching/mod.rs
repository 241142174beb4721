//! Hybrid scoring and ranking
//!
//! Everything here is pure and synchronous except the pipeline in `engine`,
//! which drives the similarity queries.

pub mod engine;
pub mod normalizer;
pub mod ranker;
pub mod scorer;
