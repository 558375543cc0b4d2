use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use answer_engine::{
    DocsAssistant, EmbeddingsProvider, EngineConfig, IngestionWriter, LlmEmbedder, LlmGenerator,
};
use doc_store::StoreConfig;
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Query-time pipeline behind `/api/search`.
    pub assistant: DocsAssistant,
    /// Write path behind `/api/embedding`.
    pub writer: IngestionWriter,
    /// Provider clients, probed by `/health`. `None` when collaborators are injected directly.
    pub llm: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    pub fn new(assistant: DocsAssistant, writer: IngestionWriter) -> Self {
        Self {
            assistant,
            writer,
            llm: None,
        }
    }

    /// Builds every collaborator once from environment variables.
    ///
    /// # Errors
    /// Invalid provider, store or engine configuration.
    pub fn from_env() -> Result<Self, AppError> {
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let (generation, embedding) = llm.profiles();
        info!(
            generation = %generation.provider,
            generation_model = %generation.model,
            embedding = %embedding.provider,
            embedding_model = %embedding.model,
            "LLM profiles loaded"
        );

        let store = doc_store::connect(&StoreConfig::from_env()?)?;
        let cfg = EngineConfig::from_env()?;

        let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(LlmEmbedder::new(llm.clone()));
        let generator = Arc::new(LlmGenerator::new(llm.clone()));

        Ok(Self {
            assistant: DocsAssistant::new(&cfg, embedder.clone(), store.clone(), generator),
            writer: IngestionWriter::new(embedder, store, cfg.namespace.clone()),
            llm: Some(llm),
        })
    }
}
