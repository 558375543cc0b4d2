//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All chunks live in one pre-provisioned collection; the namespace is a
//! keyword payload field and every query carries a `must` filter on it.

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    PointId, PointStruct, ScoredPoint, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, point_id::PointIdOptions,
};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::filters::{NAMESPACE_FIELD, namespace_filter};
use crate::payload::{json_to_payload, payload_to_json};
use crate::record::{DocMetadata, DocumentChunk, ScoredMatch, VectorQuery};
use crate::store::{StoreFuture, VectorStoreClient, check_dim};

/// A facade over the Qdrant client.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    vector_dim: Option<usize>,
    exact: bool,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// No network call happens here; an unreachable server surfaces on the
    /// first query or upsert.
    ///
    /// # Errors
    /// `StoreError::Config` for invalid settings or client build failures.
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        info!(
            url = %cfg.qdrant_url,
            collection = %cfg.collection,
            "Qdrant store configured"
        );

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            vector_dim: cfg.vector_dim,
            exact: cfg.exact_search,
        })
    }

    async fn search(&self, q: VectorQuery) -> Result<Vec<ScoredMatch>, StoreError> {
        debug!(
            collection = %self.collection,
            namespace = %q.namespace,
            top_k = q.top_k,
            "searching"
        );

        let mut builder = SearchPointsBuilder::new(&self.collection, q.vector, q.top_k as u64)
            .with_payload(q.include_metadata)
            .filter(namespace_filter(&q.namespace));
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut out: Vec<ScoredMatch> = res.result.into_iter().map(to_match).collect();
        // Qdrant already orders by score; keep the contract explicit.
        out.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(hits = out.len(), "search completed");
        Ok(out)
    }

    async fn put(&self, namespace: &str, chunk: DocumentChunk) -> Result<(), StoreError> {
        check_dim(&chunk.vector, self.vector_dim)?;

        let mut payload = serde_json::to_value(&chunk.metadata)
            .map_err(|e| StoreError::Write(format!("payload encode: {e}")))?;
        if let Some(obj) = payload.as_object_mut() {
            obj.insert(NAMESPACE_FIELD.into(), namespace.into());
        }

        let point = PointStruct {
            id: Some(PointId::from(chunk.id.to_string())),
            payload: json_to_payload(payload),
            vectors: Some(chunk.vector.into()),
            ..Default::default()
        };

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        info!(id = %chunk.id, namespace, "chunk upserted");
        Ok(())
    }
}

impl VectorStoreClient for QdrantFacade {
    fn query(&self, query: VectorQuery) -> StoreFuture<'_, Vec<ScoredMatch>> {
        Box::pin(self.search(query))
    }

    fn upsert<'a>(&'a self, namespace: &'a str, chunk: DocumentChunk) -> StoreFuture<'a, ()> {
        Box::pin(self.put(namespace, chunk))
    }
}

fn to_match(p: ScoredPoint) -> ScoredMatch {
    let id = match p.id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(u)) => u,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    };
    let metadata = if p.payload.is_empty() {
        None
    } else {
        match serde_json::from_value::<DocMetadata>(payload_to_json(p.payload)) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(%id, error = %e, "payload without usable `data`");
                None
            }
        }
    };
    ScoredMatch {
        id,
        score: p.score,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::record::DocData;

    #[test]
    fn scored_point_maps_list_data() {
        let p = ScoredPoint {
            id: Some(PointId::from("7f1c0b1e-0000-4000-8000-000000000001".to_string())),
            payload: json_to_payload(json!({ "namespace": "api_docs", "data": ["a", "b"] })),
            score: 0.9,
            ..Default::default()
        };
        let m = to_match(p);
        assert_eq!(m.id, "7f1c0b1e-0000-4000-8000-000000000001");
        assert_eq!(
            m.metadata.map(|md| md.data),
            Some(DocData::Many(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn missing_payload_means_no_metadata() {
        let p = ScoredPoint {
            id: Some(PointId::from(42u64)),
            payload: HashMap::new(),
            score: 0.4,
            ..Default::default()
        };
        let m = to_match(p);
        assert_eq!(m.id, "42");
        assert!(m.metadata.is_none());
    }

    #[test]
    fn rejects_empty_collection_name() {
        let mut cfg = StoreConfig::new_default("http://localhost:6334", "docs");
        cfg.collection = " ".into();
        assert!(matches!(QdrantFacade::new(&cfg), Err(StoreError::Config(_))));
    }
}
