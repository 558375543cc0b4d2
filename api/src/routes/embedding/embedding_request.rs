use serde::{Deserialize, Serialize};

/// Request payload for /api/embedding.
#[derive(Debug, Default, Deserialize)]
pub struct EmbeddingRequest {
    /// Documentation summary to index.
    #[serde(default)]
    pub summary: Option<String>,
}

impl EmbeddingRequest {
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Response payload for /api/embedding.
#[derive(Debug, Serialize)]
pub struct EmbeddingResponse {
    pub message: &'static str,
    /// Identifier of the stored record.
    pub id: String,
}
