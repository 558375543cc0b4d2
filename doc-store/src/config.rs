//! Backend selection and Qdrant connection settings.

use std::str::FromStr;

use crate::errors::StoreError;

/// Which backend serves vector queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    /// Remote Qdrant collection.
    Qdrant,
    /// Process-local store; contents vanish on restart.
    Memory,
}

impl FromStr for StoreKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qdrant" => Ok(Self::Qdrant),
            "memory" | "inmemory" | "in-memory" => Ok(Self::Memory),
            other => Err(StoreError::Config(format!(
                "DOC_STORE_KIND: unsupported store `{other}`"
            ))),
        }
    }
}

/// Configuration for the vector store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Backend kind.
    pub kind: StoreKind,
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name. The collection must already exist.
    pub collection: String,
    /// Expected vector length; upserts with another length are rejected.
    pub vector_dim: Option<usize>,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl StoreConfig {
    /// Sane defaults for a given Qdrant endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            kind: StoreKind::Qdrant,
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            vector_dim: None,
            exact_search: false,
        }
    }

    /// In-memory configuration, used by local runs and tests.
    pub fn memory(vector_dim: Option<usize>) -> Self {
        Self {
            kind: StoreKind::Memory,
            vector_dim,
            ..Self::new_default("http://localhost:6334", "docs")
        }
    }

    /// Reads `DOC_STORE_KIND`, `QDRANT_URL`, `QDRANT_API_KEY`,
    /// `QDRANT_COLLECTION` and `EMBEDDING_DIM` from the process environment.
    ///
    /// # Errors
    /// Unknown store kinds or a non-numeric `EMBEDDING_DIM`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|k| {
            std::env::var(k)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    /// Same as [`StoreConfig::from_env`] against an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("DOC_STORE_KIND") {
            Some(k) => k.parse()?,
            None => StoreKind::Qdrant,
        };
        let vector_dim = match lookup("EMBEDDING_DIM") {
            Some(v) => Some(v.parse::<usize>().map_err(|_| {
                StoreError::Config(format!("EMBEDDING_DIM: expected positive integer, got `{v}`"))
            })?),
            None => None,
        };

        let cfg = Self {
            kind,
            qdrant_url: lookup("QDRANT_URL").unwrap_or_else(|| "http://localhost:6334".into()),
            qdrant_api_key: lookup("QDRANT_API_KEY"),
            collection: lookup("QDRANT_COLLECTION").unwrap_or_else(|| "docs".into()),
            vector_dim,
            exact_search: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.vector_dim == Some(0) {
            return Err(StoreError::Config("EMBEDDING_DIM must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_point_at_local_qdrant() {
        let cfg = StoreConfig::from_lookup(env_of(&[])).unwrap();
        assert_eq!(cfg.kind, StoreKind::Qdrant);
        assert_eq!(cfg.qdrant_url, "http://localhost:6334");
        assert_eq!(cfg.collection, "docs");
        assert_eq!(cfg.vector_dim, None);
    }

    #[test]
    fn memory_kind_and_dimension() {
        let cfg = StoreConfig::from_lookup(env_of(&[
            ("DOC_STORE_KIND", "Memory"),
            ("EMBEDDING_DIM", "768"),
        ]))
        .unwrap();
        assert_eq!(cfg.kind, StoreKind::Memory);
        assert_eq!(cfg.vector_dim, Some(768));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(StoreConfig::from_lookup(env_of(&[("DOC_STORE_KIND", "pinecone")])).is_err());
        assert!(StoreConfig::from_lookup(env_of(&[("EMBEDDING_DIM", "wide")])).is_err());
        assert!(StoreConfig::from_lookup(env_of(&[("EMBEDDING_DIM", "0")])).is_err());
    }
}
