//! Core data models stored in and returned by the vector store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snippet payload of a chunk: a single string or an ordered list of strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocData {
    One(String),
    Many(Vec<String>),
}

impl DocData {
    /// Snippets in stored order.
    pub fn snippets(&self) -> Vec<&str> {
        match self {
            DocData::One(s) => vec![s.as_str()],
            DocData::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

impl From<String> for DocData {
    fn from(s: String) -> Self {
        DocData::One(s)
    }
}

impl From<&str> for DocData {
    fn from(s: &str) -> Self {
        DocData::One(s.to_string())
    }
}

impl From<Vec<String>> for DocData {
    fn from(v: Vec<String>) -> Self {
        DocData::Many(v)
    }
}

/// Metadata attached to every chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocMetadata {
    pub data: DocData,
}

impl DocMetadata {
    pub fn new(data: impl Into<DocData>) -> Self {
        Self { data: data.into() }
    }
}

/// A vector plus its metadata, ready for upsert.
#[derive(Clone, Debug)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub metadata: DocMetadata,
}

impl DocumentChunk {
    /// Creates a chunk with a fresh random id.
    pub fn new(vector: Vec<f32>, metadata: DocMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            metadata,
        }
    }
}

/// Similarity query restricted to one namespace.
#[derive(Clone, Debug)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub namespace: String,
    pub top_k: usize,
    pub include_metadata: bool,
}

/// One hit. `metadata` is `None` when not requested or not decodable.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<DocMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_accepts_string_or_list() {
        let one: DocMetadata = serde_json::from_str(r#"{"data":"Use a bearer token."}"#).unwrap();
        assert_eq!(one.data.snippets(), vec!["Use a bearer token."]);

        let many: DocMetadata =
            serde_json::from_str(r#"{"data":["GET /portfolio","Returns holdings"],"namespace":"api_docs"}"#)
                .unwrap();
        assert_eq!(many.data.snippets(), vec!["GET /portfolio", "Returns holdings"]);
    }

    #[test]
    fn single_string_serializes_flat() {
        let json = serde_json::to_value(DocMetadata::new("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "data": "x" }));
    }

    #[test]
    fn chunks_get_distinct_ids() {
        let a = DocumentChunk::new(vec![0.1], DocMetadata::new("a"));
        let b = DocumentChunk::new(vec![0.1], DocMetadata::new("a"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.get_version_num(), 4);
    }
}
