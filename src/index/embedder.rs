//! Deterministic hash embeddings
//!
//! FNV-1a token hashing into a fixed-dimension vector. No model files, fully
//! reproducible across runs and platforms. Used when input records carry no
//! precomputed embedding; a real inference backend plugs in through the
//! `Embedder` trait.

use crate::index::Embedder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash embedder using FNV-1a with signed bucket accumulation.
pub struct FnvHashEmbedder {
    dim: usize,
}

/// Conventional name used throughout the crate.
pub type HashEmbedder = FnvHashEmbedder;

impl Default for FnvHashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl FnvHashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn fnv1a(token: &str) -> u64 {
        let mut hash = FNV_OFFSET;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }
}

impl Embedder for FnvHashEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];

        for raw in text.split_whitespace() {
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.is_empty() {
                continue;
            }

            let hash = Self::fnv1a(&token);
            let bucket = (hash % self.dim as u64) as usize;
            // High bit decides the sign so unrelated tokens cancel rather
            // than drift positive.
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_is_deterministic() {
        let embedder = FnvHashEmbedder::default();
        let a = embedder.embed("rust systems programming");
        let b = embedder.embed("rust systems programming");
        assert_eq!(a, b);
    }

    #[test]
    fn embedding_has_configured_dimension() {
        let embedder = FnvHashEmbedder::new(64);
        assert_eq!(embedder.dimension(), 64);
        assert_eq!(embedder.embed("python sql").len(), 64);
    }

    #[test]
    fn nonempty_text_is_unit_length() {
        let embedder = FnvHashEmbedder::default();
        let vector = embedder.embed("distributed backend services");
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = FnvHashEmbedder::default();
        let vector = embedder.embed("   ");
        assert!(vector.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn case_and_punctuation_do_not_change_tokens() {
        let embedder = FnvHashEmbedder::default();
        assert_eq!(embedder.embed("Python, SQL"), embedder.embed("python sql"));
    }
}
