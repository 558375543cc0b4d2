//! Typed errors for the answer-engine crate.

use doc_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Embeddings were empty or unusable (e.g. zero-length first vector).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The embedding backend failed.
    #[error("embedding service error: {0}")]
    EmbeddingService(String),

    /// Vector store query or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The generative model call failed.
    #[error("generation error: {0}")]
    Generation(String),

    /// Model output did not match the expected envelope.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Failures while extracting the structured answer from model text.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON block")]
    NoJsonBlock,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("unexpected answer shape: {0}")]
    Shape(String),
}
