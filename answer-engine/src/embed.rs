//! Embedding collaborator: text in, vector out.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;

use crate::error::EngineError;

/// Boxed future used at every collaborator seam of this crate.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, EngineError>> + Send + 'a>>;

/// Maps a text to its embedding vector. No caching, no retries.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> EngineFuture<'a, Vec<f32>>;
}

/// [`EmbeddingsProvider`] backed by the shared LLM service's embedding profile.
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EngineFuture<'a, Vec<f32>> {
        Box::pin(async move {
            self.svc
                .embed(text)
                .await
                .map_err(|e| EngineError::EmbeddingService(e.to_string()))
        })
    }
}
