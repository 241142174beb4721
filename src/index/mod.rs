//! Boundary to the external vector index and embedding service
//!
//! Both collaborators are modeled as capability traits so any conforming
//! backend can be substituted without touching the scoring and ranking logic.

pub mod embedder;
pub mod memory;

pub use embedder::HashEmbedder;
pub use memory::MemoryIndex;

use crate::error::Result;
use std::future::Future;

/// One similarity hit returned by a vector query. Ephemeral; the score is in
/// the index's native range until the scorer rescales it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityHit {
    pub id: String,
    pub score: f32,
}

/// Namespace-scoped vector storage and query.
///
/// Queries are idempotent for unchanged index state. Unavailability is
/// surfaced as a recoverable error, never a panic.
pub trait VectorIndex: Send + Sync + 'static {
    /// Insert or replace a vector under `id` within `namespace`.
    fn upsert(
        &self,
        namespace: &str,
        id: &str,
        vector: Vec<f32>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Read back a stored vector, None when the id is unknown.
    fn fetch(
        &self,
        namespace: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Vec<f32>>>> + Send;

    /// Top-N nearest entries within `namespace`, sorted by descending
    /// semantic score. May return fewer than `top_n` hits.
    fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_n: usize,
    ) -> impl Future<Output = Result<Vec<SimilarityHit>>> + Send;
}

/// Text embedding as a black-box capability. The core never trains or loads
/// models; it only consumes vectors.
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Vec<f32>;
}
