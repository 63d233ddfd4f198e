// file: src/embeddings/hash.rs
// description: deterministic offline embedding provider based on token feature hashing
// reference: fallback used when no embedding API key is configured

use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Deterministic embedder. Hashes each token into a handful of vector slots,
/// then L2-normalizes. Same text always maps to the same vector, and texts
/// sharing tokens land closer together than unrelated ones.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            // Each token contributes four signed slots from its digest.
            for chunk in digest.chunks_exact(4).take(4) {
                let idx =
                    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], 0]) as usize % self.dimensions;
                let sign = if chunk[3] & 1 == 0 { 1.0 } else { -1.0 };
                vector[idx] += sign;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashEmbedder::new(128);
        let a = embedder.embed("same text").await.unwrap();
        let b = embedder.embed("same text").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
    }

    #[tokio::test]
    async fn test_normalized() {
        let embedder = HashEmbedder::new(256);
        let v = embedder.embed("the quick brown fox").await.unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();

        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_tokens_are_closer() {
        let embedder = HashEmbedder::new(256);
        let base = embedder.embed("rust vector search engine").await.unwrap();
        let near = embedder.embed("rust vector search library").await.unwrap();
        let far = embedder.embed("quarterly marketing budget").await.unwrap();

        assert!(cosine(&base, &near) > cosine(&base, &far));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let embedder = HashEmbedder::new(64);
        let out = embedder.embed_batch(&[]).await.unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_tokenize_splits_and_lowercases() {
        let tokens: Vec<String> = tokenize("Hello, World-2!").collect();
        assert_eq!(tokens, vec!["hello", "world", "2"]);
    }
}
