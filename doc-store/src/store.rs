//! The vector store contract shared by every backend.

use std::{future::Future, pin::Pin};

use crate::errors::StoreError;
use crate::record::{DocumentChunk, ScoredMatch, VectorQuery};

/// Boxed future returned by [`VectorStoreClient`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Namespaced similarity search and upsert.
///
/// Implementations must return matches sorted by descending score, at most
/// `top_k` of them, all from the requested namespace.
pub trait VectorStoreClient: Send + Sync {
    /// Nearest neighbours of `query.vector` inside `query.namespace`.
    fn query(&self, query: VectorQuery) -> StoreFuture<'_, Vec<ScoredMatch>>;

    /// Inserts or replaces `chunk` in `namespace`.
    fn upsert<'a>(&'a self, namespace: &'a str, chunk: DocumentChunk) -> StoreFuture<'a, ()>;
}

/// Rejects vectors whose length differs from `want` (when configured).
pub(crate) fn check_dim(vector: &[f32], want: Option<usize>) -> Result<(), StoreError> {
    match want {
        Some(want) if vector.len() != want => Err(StoreError::VectorSizeMismatch {
            got: vector.len(),
            want,
        }),
        _ => Ok(()),
    }
}
