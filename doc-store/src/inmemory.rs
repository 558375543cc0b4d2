//! In-memory vector store using cosine similarity.
//!
//! Namespaces map to chunk lists behind a `tokio::sync::RwLock`. Suitable for
//! local development and tests; nothing is persisted.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::StoreError;
use crate::record::{DocumentChunk, ScoredMatch, VectorQuery};
use crate::store::{StoreFuture, VectorStoreClient, check_dim};

/// Process-local [`VectorStoreClient`].
#[derive(Debug, Default)]
pub struct InMemoryDocStore {
    namespaces: RwLock<HashMap<String, Vec<DocumentChunk>>>,
    vector_dim: Option<usize>,
}

impl InMemoryDocStore {
    pub fn new(vector_dim: Option<usize>) -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
            vector_dim,
        }
    }

    /// Number of chunks stored in `namespace`.
    pub async fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .map_or(0, Vec::len)
    }

    async fn search(&self, q: VectorQuery) -> Result<Vec<ScoredMatch>, StoreError> {
        let guard = self.namespaces.read().await;
        let Some(chunks) = guard.get(&q.namespace) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredMatch> = chunks
            .iter()
            .map(|c| ScoredMatch {
                id: c.id.to_string(),
                score: cosine_similarity(&c.vector, &q.vector),
                metadata: q.include_metadata.then(|| c.metadata.clone()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(q.top_k);
        debug!(namespace = %q.namespace, hits = scored.len(), "in-memory search");
        Ok(scored)
    }

    async fn put(&self, namespace: &str, chunk: DocumentChunk) -> Result<(), StoreError> {
        check_dim(&chunk.vector, self.vector_dim)?;
        let mut guard = self.namespaces.write().await;
        let list = guard.entry(namespace.to_string()).or_default();
        match list.iter_mut().find(|c| c.id == chunk.id) {
            Some(existing) => *existing = chunk,
            None => list.push(chunk),
        }
        Ok(())
    }
}

impl VectorStoreClient for InMemoryDocStore {
    fn query(&self, query: VectorQuery) -> StoreFuture<'_, Vec<ScoredMatch>> {
        Box::pin(self.search(query))
    }

    fn upsert<'a>(&'a self, namespace: &'a str, chunk: DocumentChunk) -> StoreFuture<'a, ()> {
        Box::pin(self.put(namespace, chunk))
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude or lengths differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    proptest! {
        #[test]
        fn similarity_is_bounded(
            a in proptest::collection::vec(-10.0f32..10.0, 4),
            b in proptest::collection::vec(-10.0f32..10.0, 4),
        ) {
            let s = cosine_similarity(&a, &b);
            prop_assert!((-1.0001..=1.0001).contains(&s));
        }
    }
}
