//! Health probes for the configured LLM backends.
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth
//! - Gemini: `GET {endpoint}/v1beta/models/{model}` with `x-goog-api-key`
//!
//! [`HealthService::check`] never fails: errors become `ok = false` snapshots,
//! which is what the `/health` route renders.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    AiLlmError, HttpError, ProviderError, ProviderErrorKind, checked_endpoint, make_snippet,
};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Ollama", "Gemini").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe looked for.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Latency of the probe in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.base_url().to_string(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks one config. Never returns an error.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.try_probe_ollama(cfg).await,
            LlmProvider::OpenAI => self.try_probe_openai(cfg).await,
            LlmProvider::Gemini => self.try_probe_gemini(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok((ok, message)) => {
                info!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    ok,
                    latency_ms = latency,
                    "health probe completed"
                );
                HealthStatus::new(cfg, ok, latency, message)
            }
            Err(err) => {
                warn!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    latency_ms = latency,
                    error = %err,
                    "health probe failed"
                );
                HealthStatus::new(cfg, false, latency, err.to_string())
            }
        }
    }

    /// Checks several configs sequentially.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health probes");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    async fn try_probe_ollama(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let base = checked_endpoint(cfg.provider, &cfg.endpoint)?;
        let url = format!("{base}/api/tags");
        let resp = self.get(cfg, &url, None).await?;

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        Ok(match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) => {
                if models.iter().any(|m| m.name == cfg.model) {
                    (true, "Ollama is healthy; model is available".into())
                } else {
                    (false, "Ollama is up, but model not found in /api/tags".into())
                }
            }
            Ok(Tags { models: None }) => (
                true,
                "Ollama is healthy; tags response without `models` field".into(),
            ),
            Err(e) => (
                true,
                format!("Ollama is reachable; failed to decode /api/tags: {e}"),
            ),
        })
    }

    async fn try_probe_openai(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let base = checked_endpoint(cfg.provider, &cfg.endpoint)?;
        let url = format!("{base}/v1/models");
        let key = api_key(cfg)?;
        let auth = ("authorization", format!("Bearer {key}"));
        let resp = self.get(cfg, &url, Some(auth)).await?;

        // Expected minimal JSON: { "data": [ { "id": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        Ok(match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => {
                (true, "OpenAI is healthy; model is available".into())
            }
            Ok(_) => (false, "OpenAI is up, but model not found in /v1/models".into()),
            Err(e) => (
                true,
                format!("OpenAI is reachable; failed to decode /v1/models: {e}"),
            ),
        })
    }

    async fn try_probe_gemini(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let base = checked_endpoint(cfg.provider, &cfg.endpoint)?;
        let model = cfg.model.trim_start_matches("models/");
        let url = format!("{base}/v1beta/models/{model}");
        let key = api_key(cfg)?;
        self.get(cfg, &url, Some(("x-goog-api-key", key.to_string())))
            .await?;
        Ok((true, "Gemini is healthy; model is available".into()))
    }

    /// GET with the per-config timeout; non-2xx becomes an `HttpStatus` error.
    async fn get(
        &self,
        cfg: &LlmModelConfig,
        url: &str,
        auth: Option<(&str, String)>,
    ) -> Result<reqwest::Response, AiLlmError> {
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        debug!(provider = %cfg.provider, model = %cfg.model, "GET {}", url);
        let mut req = self.client.get(url).timeout(timeout);
        if let Some((name, value)) = auth {
            req = req.header(name, value);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                cfg.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url: url.to_string(),
                    snippet: make_snippet(&text),
                }),
            )
            .into());
        }
        Ok(resp)
    }
}

fn api_key(cfg: &LlmModelConfig) -> Result<&str, AiLlmError> {
    cfg.api_key
        .as_deref()
        .ok_or_else(|| ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_endpoint_is_reported_not_raised() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: "localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        };
        let status = svc.check(&cfg).await;
        assert!(!status.ok);
        assert_eq!(status.provider, "Ollama");
        assert!(status.message.contains("invalid endpoint"));
    }

    #[tokio::test]
    async fn hosted_probe_without_key_fails() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-1.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        };
        let status = svc.check(&cfg).await;
        assert!(!status.ok);
        assert!(status.message.contains("missing API key"));
    }
}
