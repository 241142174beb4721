//! In-memory brute-force vector index
//!
//! Namespace-partitioned cosine-similarity backend for local runs and tests.
//! Exhaustive scan per query; fine for the batch sizes this tool handles.

use crate::error::Result;
use crate::index::{SimilarityHit, VectorIndex};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryIndex {
    namespaces: RwLock<HashMap<String, HashMap<String, Vec<f32>>>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vectors stored under a namespace.
    pub fn count(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|ns| ns.get(namespace).map_or(0, |vectors| vectors.len()))
            .unwrap_or(0)
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }
}

impl VectorIndex for MemoryIndex {
    async fn upsert(&self, namespace: &str, id: &str, vector: Vec<f32>) -> Result<()> {
        let mut namespaces = self
            .namespaces
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(id.to_string(), vector);
        Ok(())
    }

    async fn fetch(&self, namespace: &str, id: &str) -> Result<Option<Vec<f32>>> {
        let namespaces = self
            .namespaces
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(namespaces
            .get(namespace)
            .and_then(|vectors| vectors.get(id))
            .cloned())
    }

    async fn query(&self, namespace: &str, vector: &[f32], top_n: usize) -> Result<Vec<SimilarityHit>> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let namespaces = self
            .namespaces
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(vectors) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<SimilarityHit> = vectors
            .iter()
            .map(|(id, stored)| SimilarityHit {
                id: id.clone(),
                score: Self::cosine_similarity(vector, stored),
            })
            .collect();

        // Descending score, id ascending on ties so repeated queries return
        // byte-identical hit lists.
        hits.sort_unstable_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(top_n);

        Ok(hits)
    }
}
