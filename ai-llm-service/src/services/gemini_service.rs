//! Gemini (Google Generative Language API) service.
//!
//! - POST {endpoint}/v1beta/models/{model}:generateContent → text generation
//! - POST {endpoint}/v1beta/models/{model}:embedContent    → embeddings
//!
//! Authentication uses the `x-goog-api-key` header, so keys never appear in
//! URLs that end up in logs or error snippets.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, ProviderError, ProviderErrorKind, checked_endpoint, make_snippet,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thin client for Gemini models.
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embed: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`].
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Gemini
    /// - `MissingApiKey` if no key is configured
    /// - `InvalidEndpoint` for malformed base URLs
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(
                ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into(),
            );
        }
        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(LlmProvider::Gemini, ProviderErrorKind::MissingApiKey)
        })?;
        let base = checked_endpoint(LlmProvider::Gemini, &cfg.endpoint)?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(
                    LlmProvider::Gemini,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .build()?;

        let model = cfg.model.trim_start_matches("models/").to_string();
        info!(model = %model, endpoint = %base, "GeminiService initialized");

        Ok(Self {
            client,
            url_generate: format!("{base}/v1beta/models/{model}:generateContent"),
            url_embed: format!("{base}/v1beta/models/{model}:embedContent"),
            cfg,
        })
    }

    /// Generates text from a multi-part instruction sent as one user turn.
    ///
    /// # Errors
    /// Non-2xx status, transport failures, undecodable bodies, or a response
    /// without any text candidate.
    #[instrument(skip_all, fields(model = %self.cfg.model, parts = parts.len()))]
    pub async fn generate(&self, parts: &[String]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, parts);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_generate).await);
        }

        let out: GenerateContentResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::Gemini,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts`"
                )),
            )
        })?;

        let text = out.first_text().ok_or_else(|| {
            ProviderError::new(LlmProvider::Gemini, ProviderErrorKind::EmptyChoices)
        })?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            "generateContent completed"
        );
        Ok(text)
    }

    /// Embeds one text via `embedContent`.
    ///
    /// # Errors
    /// Non-2xx status, transport failures, or undecodable bodies.
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let body = EmbedContentRequest {
            content: Content {
                role: None,
                parts: vec![Part { text: input }],
            },
        };

        debug!("POST {}", self.url_embed);
        let resp = self.client.post(&self.url_embed).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_embed).await);
        }

        let out: EmbedContentResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::Gemini,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `embedding.values`")),
            )
        })?;

        Ok(out.embedding.values)
    }

    async fn status_error(&self, resp: reqwest::Response, url: &str) -> AiLlmError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);
        error!(%status, %url, %snippet, model = %self.cfg.model, "Gemini returned non-success status");
        ProviderError::new(
            LlmProvider::Gemini,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }),
        )
        .into()
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, parts: &'a [String]) -> Self {
        let generation_config =
            if cfg.temperature.is_some() || cfg.top_p.is_some() || cfg.max_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: cfg.temperature,
                    top_p: cfg.top_p,
                    max_output_tokens: cfg.max_tokens,
                })
            } else {
                None
            };

        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: parts.iter().map(|p| Part { text: p }).collect(),
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate that has any.
    fn first_text(self) -> Option<String> {
        self.candidates.into_iter().find_map(|c| {
            let text: String = c
                .content?
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect();
            (!text.is_empty()).then_some(text)
        })
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    content: Content<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "models/gemini-1.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com/".into(),
            api_key: Some("key".into()),
            max_tokens: Some(1024),
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn urls_strip_models_prefix() {
        let svc = GeminiService::new(cfg()).unwrap();
        assert_eq!(
            svc.url_generate,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(svc.url_embed.ends_with("gemini-1.5-flash:embedContent"));
    }

    #[test]
    fn request_carries_parts_in_order() {
        let c = cfg();
        let parts = vec!["first".to_string(), "second".to_string()];
        let body = serde_json::to_value(GenerateContentRequest::from_cfg(&c, &parts)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "first");
        assert_eq!(body["contents"][0]["parts"][1]["text"], "second");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn first_text_skips_empty_candidates() {
        let raw = serde_json::json!({
            "candidates": [
                { "content": { "parts": [] } },
                { "content": { "parts": [ { "text": "a" }, { "text": "b" } ] } }
            ]
        });
        let out: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(out.first_text().as_deref(), Some("ab"));
    }
}
