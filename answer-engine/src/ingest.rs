//! One-shot write path: embed a documentation summary and store it.

use std::sync::Arc;

use doc_store::{DocMetadata, DocumentChunk, VectorStoreClient};
use tracing::info;
use uuid::Uuid;

use crate::embed::EmbeddingsProvider;
use crate::error::EngineError;

pub struct IngestionWriter {
    embedder: Arc<dyn EmbeddingsProvider>,
    store: Arc<dyn VectorStoreClient>,
    namespace: String,
}

impl IngestionWriter {
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        store: Arc<dyn VectorStoreClient>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            namespace: namespace.into(),
        }
    }

    /// Embeds `summary` and upserts it as `{ data: summary }` under a fresh id.
    ///
    /// # Errors
    /// Embedding failures or [`EngineError::Store`] on write failure.
    pub async fn ingest(&self, summary: &str) -> Result<Uuid, EngineError> {
        let vector = self.embedder.embed(summary).await?;
        if vector.is_empty() {
            return Err(EngineError::Embedding("empty embedding for summary".into()));
        }

        let chunk = DocumentChunk::new(vector, DocMetadata::new(summary));
        let id = chunk.id;
        self.store.upsert(&self.namespace, chunk).await?;

        info!(%id, namespace = %self.namespace, chars = summary.len(), "summary stored");
        Ok(id)
    }
}
