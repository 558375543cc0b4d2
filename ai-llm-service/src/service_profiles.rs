//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches provider clients per config (provider+endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmModelConfig, LlmProvider, LlmServiceProfiles};
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let generation = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "qwen3:14b".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: Some(1024),
//!     temperature: Some(0.2),
//!     top_p: None,
//!     timeout_secs: Some(60),
//! };
//! let embedding = LlmModelConfig {
//!     model: "nomic-embed-text".into(),
//!     ..generation.clone()
//! };
//!
//! let svc = Arc::new(LlmServiceProfiles::new(generation, embedding, Some(10))?);
//! let answer = svc.generate(&["Say hi".to_string()]).await?;
//! let vector = svc.embed("Ferris").await?;
//! println!("{answer} / dim={}", vector.len());
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{
        env_config::{config_embedding_from_env, config_generation_from_env},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{
        gemini_service::GeminiService, ollama_service::OllamaService,
        open_ai_service::OpenAiService,
    },
};

/// Manages the **generation** and **embedding** profiles.
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
    gemini: RwLock<HashMap<ClientKey, Arc<GeminiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the health client cannot be built.
    pub fn new(
        generation: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            generation,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            gemini: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds both profiles from the process environment.
    ///
    /// # Errors
    /// Propagates configuration errors from either profile.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(
            config_generation_from_env()?,
            config_embedding_from_env()?,
            None,
        )
    }

    /// Generates text from an ordered list of instruction parts.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if client construction or the request fails.
    pub async fn generate(&self, parts: &[String]) -> Result<String, AiLlmError> {
        let cfg = &self.generation;
        match cfg.provider {
            LlmProvider::Ollama => self.ollama_client(cfg).await?.generate(parts).await,
            LlmProvider::OpenAI => self.openai_client(cfg).await?.generate(parts).await,
            LlmProvider::Gemini => self.gemini_client(cfg).await?.generate(parts).await,
        }
    }

    /// Computes one embedding vector with the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if client construction or the request fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let cfg = &self.embedding;
        match cfg.provider {
            LlmProvider::Ollama => self.ollama_client(cfg).await?.embeddings(input).await,
            LlmProvider::OpenAI => self.openai_client(cfg).await?.embeddings(input).await,
            LlmProvider::Gemini => self.gemini_client(cfg).await?.embeddings(input).await,
        }
    }

    /// Returns a health snapshot for each distinct profile.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = vec![self.generation.clone()];
        if !same_backend(&self.generation, &self.embedding) {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns `(generation, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.generation, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn ollama_client(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        debug!(provider = %cfg.provider, model = %cfg.model, "cached new client");
        Ok(self.ollama.write().await.entry(key).or_insert(cli).clone())
    }

    async fn openai_client(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        debug!(provider = %cfg.provider, model = %cfg.model, "cached new client");
        Ok(self.openai.write().await.entry(key).or_insert(cli).clone())
    }

    async fn gemini_client(&self, cfg: &LlmModelConfig) -> Result<Arc<GeminiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.gemini.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(GeminiService::new(cfg.clone())?);
        debug!(provider = %cfg.provider, model = %cfg.model, "cached new client");
        Ok(self.gemini.write().await.entry(key).or_insert(cli).clone())
    }
}

/// Health probes only care about where a model lives, not how it is sampled.
fn same_backend(a: &LlmModelConfig, b: &LlmModelConfig) -> bool {
    a.provider == b.provider && a.base_url() == b.base_url() && a.model == b.model
}

/// Cache key identifying one client configuration.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.base_url().to_string(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str, endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn cache_key_ignores_trailing_slash() {
        let a = ClientKey::from(&ollama("m", "http://localhost:11434/"));
        let b = ClientKey::from(&ollama("m", "http://localhost:11434"));
        assert!(a == b);
    }

    #[test]
    fn same_backend_compares_model_and_endpoint() {
        let a = ollama("qwen3:14b", "http://localhost:11434");
        let mut b = a.clone();
        b.temperature = Some(0.0);
        assert!(same_backend(&a, &b));
        b.model = "nomic-embed-text".into();
        assert!(!same_backend(&a, &b));
    }

    #[tokio::test]
    async fn clients_are_cached_per_config() {
        let cfg = ollama("qwen3:14b", "http://localhost:11434");
        let svc = LlmServiceProfiles::new(cfg.clone(), cfg.clone(), Some(1)).unwrap();
        let first = svc.ollama_client(&cfg).await.unwrap();
        let second = svc.ollama_client(&cfg).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn invalid_endpoint_surfaces_as_error() {
        let bad = ollama("m", "not-a-url");
        let svc = LlmServiceProfiles::new(bad.clone(), bad, Some(1)).unwrap();
        assert!(svc.embed("x").await.is_err());
    }
}
