//! Multi-turn query vectorization with recency weighting.
//!
//! Every message is embedded on its own; the vectors are then averaged with
//! weights `exp((i - (n - 1)) * decay)`, normalized to sum to one, so the
//! newest message dominates and older turns fade geometrically.

use std::sync::Arc;

use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embed::EmbeddingsProvider;
use crate::error::EngineError;

/// Who wrote a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Normalized recency weights for `n` messages, oldest first.
///
/// The last weight is always the largest; the weights sum to one.
pub fn recency_weights(n: usize, decay: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..n)
        .map(|i| ((i as f64 - (n as f64 - 1.0)) * decay).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Weighted sum of `embeddings`, using the first vector's length as canonical.
///
/// Vectors of any other length are skipped with a warning; their weight is
/// not redistributed.
///
/// # Errors
/// [`EngineError::Embedding`] when there are no embeddings or the first one is empty.
pub fn combine_weighted(embeddings: &[Vec<f32>], weights: &[f64]) -> Result<Vec<f32>, EngineError> {
    let dim = match embeddings.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(EngineError::Embedding("invalid embeddings generated".into())),
    };

    let mut acc = vec![0.0f64; dim];
    for (i, (emb, w)) in embeddings.iter().zip(weights).enumerate() {
        if emb.len() != dim {
            warn!(index = i, got = emb.len(), want = dim, "embedding has incorrect size; skipped");
            continue;
        }
        for (slot, x) in acc.iter_mut().zip(emb) {
            *slot += f64::from(*x) * w;
        }
    }

    Ok(acc.into_iter().map(|x| x as f32).collect())
}

/// Produces one query vector from a question and its history.
pub struct QueryComposer {
    embedder: Arc<dyn EmbeddingsProvider>,
    decay: f64,
    concurrency: usize,
}

impl QueryComposer {
    /// `concurrency` caps embedding calls in flight; `0` is treated as `1`.
    pub fn new(embedder: Arc<dyn EmbeddingsProvider>, decay: f64, concurrency: usize) -> Self {
        Self {
            embedder,
            decay,
            concurrency: concurrency.max(1),
        }
    }

    /// Composes `history ++ [question]` into a single vector.
    ///
    /// # Errors
    /// Any failed embedding call aborts the whole composition.
    pub async fn compose(&self, question: &str, history: &[String]) -> Result<Vec<f32>, EngineError> {
        let messages: Vec<Message> = history
            .iter()
            .map(|h| Message::user(h.as_str()))
            .chain(std::iter::once(Message::user(question)))
            .collect();
        self.compose_messages(&messages).await
    }

    /// Composes an ordered conversation (oldest first) into a single vector.
    pub async fn compose_messages(&self, messages: &[Message]) -> Result<Vec<f32>, EngineError> {
        debug!(messages = messages.len(), "embedding conversation");

        // Ordered, so results line up with the weights. All calls finish
        // before any error is inspected.
        let results: Vec<_> = stream::iter(messages)
            .map(|m| self.embedder.embed(&m.text))
            .buffered(self.concurrency)
            .boxed()
            .collect()
            .await;
        let embeddings = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let weights = recency_weights(embeddings.len(), self.decay);
        combine_weighted(&embeddings, &weights)
    }
}
