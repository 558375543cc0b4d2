//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for doc-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Similarity query failed (backend unreachable, bad collection, ...).
    #[error("store query failed: {0}")]
    Query(String),

    /// Upsert failed.
    #[error("store write failed: {0}")]
    Write(String),

    /// Vector length differs from the configured dimension.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}
