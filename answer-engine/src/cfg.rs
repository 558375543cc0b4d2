//! Runtime configuration loaded from environment variables.

use crate::error::EngineError;

/// Default reply when retrieval finds nothing relevant.
pub const DEFAULT_FALLBACK: &str = "I couldn't find a good match for your question in the documentation. \
Try rephrasing it or naming the endpoint you are interested in.";

/// Retrieval and answering knobs. All fields have defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Vector store namespace holding the documentation.
    pub namespace: String,
    /// Matches requested per query.
    pub top_k: usize,
    /// Inclusive relevance threshold on the top match score.
    pub min_score: f32,
    /// Per-step decay of the recency weights.
    pub recency_decay: f64,
    /// Upper bound on embedding calls in flight for one query.
    pub embed_concurrency: usize,
    /// Content returned when nothing passes the relevance gate.
    pub fallback_message: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: "api_docs".into(),
            top_k: 4,
            min_score: 0.55,
            recency_decay: 0.5,
            embed_concurrency: 8,
            fallback_message: DEFAULT_FALLBACK.into(),
        }
    }
}

impl EngineConfig {
    /// Reads `RAG_NAMESPACE`, `RAG_TOP_K`, `RAG_MIN_SCORE`, `RAG_RECENCY_DECAY`,
    /// `RAG_EMBED_CONCURRENCY` and `RAG_FALLBACK_MESSAGE`.
    ///
    /// # Errors
    /// Malformed or out-of-range numbers.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|k| {
            std::env::var(k)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    /// Same as [`EngineConfig::from_env`] against an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let cfg = Self {
            namespace: lookup("RAG_NAMESPACE").unwrap_or(d.namespace),
            top_k: parse(&lookup, "RAG_TOP_K")?.unwrap_or(d.top_k),
            min_score: parse(&lookup, "RAG_MIN_SCORE")?.unwrap_or(d.min_score),
            recency_decay: parse(&lookup, "RAG_RECENCY_DECAY")?.unwrap_or(d.recency_decay),
            embed_concurrency: parse(&lookup, "RAG_EMBED_CONCURRENCY")?
                .unwrap_or(d.embed_concurrency),
            fallback_message: lookup("RAG_FALLBACK_MESSAGE").unwrap_or(d.fallback_message),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.namespace.trim().is_empty() {
            return Err(EngineError::Config("RAG_NAMESPACE is empty".into()));
        }
        if self.top_k == 0 {
            return Err(EngineError::Config("RAG_TOP_K must be > 0".into()));
        }
        if !self.min_score.is_finite() {
            return Err(EngineError::Config("RAG_MIN_SCORE must be finite".into()));
        }
        if !(self.recency_decay.is_finite() && self.recency_decay > 0.0) {
            return Err(EngineError::Config("RAG_RECENCY_DECAY must be > 0".into()));
        }
        if self.embed_concurrency == 0 {
            return Err(EngineError::Config("RAG_EMBED_CONCURRENCY must be > 0".into()));
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, var: &str) -> Result<Option<T>, EngineError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| EngineError::Config(format!("{var}: cannot parse `{v}`")))
        })
        .transpose()
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
    fn defaults_match_documented_values() {
        let cfg = EngineConfig::from_lookup(env_of(&[])).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.namespace, "api_docs");
        assert_eq!(cfg.top_k, 4);
        assert_eq!(cfg.min_score, 0.55);
        assert_eq!(cfg.embed_concurrency, 8);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = EngineConfig::from_lookup(env_of(&[
            ("RAG_TOP_K", "2"),
            ("RAG_MIN_SCORE", "0.7"),
            ("RAG_NAMESPACE", "v2_docs"),
            ("RAG_EMBED_CONCURRENCY", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.embed_concurrency, 3);
        assert_eq!(cfg.top_k, 2);
        assert_eq!(cfg.min_score, 0.7);
        assert_eq!(cfg.namespace, "v2_docs");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(EngineConfig::from_lookup(env_of(&[("RAG_TOP_K", "four")])).is_err());
        assert!(EngineConfig::from_lookup(env_of(&[("RAG_TOP_K", "0")])).is_err());
        assert!(EngineConfig::from_lookup(env_of(&[("RAG_RECENCY_DECAY", "-1")])).is_err());
        assert!(EngineConfig::from_lookup(env_of(&[("RAG_EMBED_CONCURRENCY", "0")])).is_err());
    }
}
