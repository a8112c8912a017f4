use async_trait::async_trait;
use ragdemo_core::{Embedding, EmbeddingError};

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = FNV_OFFSET ^ seed;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Deterministic offline embedder: identical texts map to identical vectors, unrelated texts to
/// roughly orthogonal ones. It carries no semantics and exists for tests and model-free runs.
#[derive(Clone, Debug)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn hash_to_vec(&self, text: &str) -> Vec<f32> {
        let bytes = text.trim().as_bytes();
        (0..self.dimension)
            .map(|idx| {
                let value = fnv1a(bytes, idx as u64);
                (value % 20_000) as f32 / 10_000.0 - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl Embedding for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.hash_to_vec(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.hash_to_vec(text)).collect())
    }
}
