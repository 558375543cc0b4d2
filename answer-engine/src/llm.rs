//! Generative model collaborator.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;

use crate::embed::EngineFuture;
use crate::error::EngineError;

/// Turns an ordered multi-part instruction into free text.
pub trait Generator: Send + Sync {
    fn generate<'a>(&'a self, parts: &'a [String]) -> EngineFuture<'a, String>;
}

/// [`Generator`] backed by the shared LLM service's generation profile.
pub struct LlmGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl Generator for LlmGenerator {
    fn generate<'a>(&'a self, parts: &'a [String]) -> EngineFuture<'a, String> {
        Box::pin(async move {
            self.svc
                .generate(parts)
                .await
                .map_err(|e| EngineError::Generation(e.to_string()))
        })
    }
}
