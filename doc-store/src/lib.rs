//! Namespaced vector storage for documentation chunks.
//!
//! This crate provides:
//! - the [`VectorStoreClient`] contract (namespaced similarity query + upsert)
//! - a Qdrant backend ([`QdrantFacade`]) over one pre-provisioned collection
//! - an in-memory backend ([`InMemoryDocStore`]) for local runs and tests

mod config;
mod errors;
mod filters;
mod inmemory;
mod payload;
mod qdrant_facade;
mod record;
mod store;

use std::sync::Arc;

pub use config::{StoreConfig, StoreKind};
pub use errors::StoreError;
pub use inmemory::InMemoryDocStore;
pub use qdrant_facade::QdrantFacade;
pub use record::{DocData, DocMetadata, DocumentChunk, ScoredMatch, VectorQuery};
pub use store::{StoreFuture, VectorStoreClient};

use tracing::info;

/// Builds the backend selected by `cfg.kind`.
///
/// # Errors
/// Returns `StoreError::Config` if the Qdrant client cannot be built.
pub fn connect(cfg: &StoreConfig) -> Result<Arc<dyn VectorStoreClient>, StoreError> {
    info!(kind = ?cfg.kind, "connecting vector store");
    Ok(match cfg.kind {
        StoreKind::Qdrant => Arc::new(QdrantFacade::new(cfg)?),
        StoreKind::Memory => Arc::new(InMemoryDocStore::new(cfg.vector_dim)),
    })
}
