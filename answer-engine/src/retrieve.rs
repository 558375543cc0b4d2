//! Namespaced similarity search behind a relevance gate.

use std::sync::Arc;

use doc_store::{ScoredMatch, VectorQuery, VectorStoreClient};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Outcome of a retrieval.
#[derive(Clone, Debug, PartialEq)]
pub enum Retrieval {
    /// Matches in descending score order; the first one passed the gate.
    Ranked(Vec<ScoredMatch>),
    /// Nothing returned, or the best score was below the threshold.
    NoConfidentMatch,
}

pub struct Retriever {
    store: Arc<dyn VectorStoreClient>,
    namespace: String,
    top_k: usize,
    min_score: f32,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorStoreClient>,
        namespace: impl Into<String>,
        top_k: usize,
        min_score: f32,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            top_k,
            min_score,
        }
    }

    /// Queries the store and applies the gate (`top_score >= min_score`).
    ///
    /// # Errors
    /// Store failures propagate as [`EngineError::Store`].
    pub async fn retrieve(&self, vector: Vec<f32>) -> Result<Retrieval, EngineError> {
        let mut matches = self
            .store
            .query(VectorQuery {
                vector,
                namespace: self.namespace.clone(),
                top_k: self.top_k,
                include_metadata: true,
            })
            .await?;

        let before = matches.len();
        matches.retain(|m| m.score.is_finite());
        if matches.len() < before {
            warn!(dropped = before - matches.len(), "non-finite scores dropped");
        }
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        match matches.first() {
            Some(top) if top.score >= self.min_score => {
                debug!(hits = matches.len(), top_score = top.score, "confident match");
                Ok(Retrieval::Ranked(matches))
            }
            Some(top) => {
                warn!(
                    top_score = top.score,
                    min_score = self.min_score,
                    "best match below relevance threshold"
                );
                Ok(Retrieval::NoConfidentMatch)
            }
            None => {
                warn!(namespace = %self.namespace, "no matches returned");
                Ok(Retrieval::NoConfidentMatch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use doc_store::{DocMetadata, DocumentChunk, StoreError, StoreFuture};

    use super::*;

    struct FixedStore(Vec<f32>);

    impl VectorStoreClient for FixedStore {
        fn query(&self, _q: VectorQuery) -> StoreFuture<'_, Vec<ScoredMatch>> {
            let out = self
                .0
                .iter()
                .enumerate()
                .map(|(i, s)| ScoredMatch {
                    id: i.to_string(),
                    score: *s,
                    metadata: Some(DocMetadata::new(format!("doc {i}"))),
                })
                .collect();
            Box::pin(async move { Ok(out) })
        }

        fn upsert<'a>(&'a self, _ns: &'a str, _c: DocumentChunk) -> StoreFuture<'a, ()> {
            Box::pin(async { Err(StoreError::Write("read-only".into())) })
        }
    }

    async fn run(scores: Vec<f32>) -> Retrieval {
        Retriever::new(Arc::new(FixedStore(scores)), "api_docs", 4, 0.55)
            .retrieve(vec![1.0])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        assert!(matches!(run(vec![0.55]).await, Retrieval::Ranked(_)));
        assert_eq!(run(vec![0.5499]).await, Retrieval::NoConfidentMatch);
    }

    #[tokio::test]
    async fn empty_result_is_not_confident() {
        assert_eq!(run(vec![]).await, Retrieval::NoConfidentMatch);
    }

    #[tokio::test]
    async fn non_finite_scores_do_not_close_the_gate() {
        match run(vec![0.8, f32::NAN, f32::INFINITY, 0.6]).await {
            Retrieval::Ranked(m) => {
                let scores: Vec<f32> = m.iter().map(|x| x.score).collect();
                assert_eq!(scores, vec![0.8, 0.6]);
            }
            other => panic!("expected ranked, got {other:?}"),
        }
        assert_eq!(run(vec![f32::NAN]).await, Retrieval::NoConfidentMatch);
    }

    #[tokio::test]
    async fn ranked_output_is_descending() {
        match run(vec![0.6, 0.9, 0.7]).await {
            Retrieval::Ranked(m) => {
                let scores: Vec<f32> = m.iter().map(|x| x.score).collect();
                assert_eq!(scores, vec![0.9, 0.7, 0.6]);
            }
            other => panic!("expected ranked, got {other:?}"),
        }
    }
}
