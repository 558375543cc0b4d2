//! Profile configs loaded from environment variables.
//!
//! Two roles are resolved:
//!
//! - **Generation** → the model that writes answers
//! - **Embedding**  → the model that turns text into vectors
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`        = generation provider (`ollama` | `openai` | `gemini`, default `ollama`)
//! - `EMBEDDING_KIND`  = embedding provider (defaults to `LLM_KIND`)
//! - `LLM_MAX_TOKENS`  = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64, default 60)
//! - `EMBEDDING_MODEL` = embedding model (provider default when unset)
//!
//! Ollama: `OLLAMA_URL` or `OLLAMA_PORT`, `OLLAMA_MODEL`.
//! OpenAI: `OPENAI_URL`, `OPENAI_API_KEY` (required), `OPENAI_MODEL`.
//! Gemini: `GEMINI_URL`, `GEMINI_API_KEY` (required), `GEMINI_MODEL`.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt, validate_http_endpoint},
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Which logical profile is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRole {
    Generation,
    Embedding,
}

/// Builds the generation profile from the process environment.
///
/// # Errors
/// Missing credentials, unknown provider names, or malformed numbers.
pub fn config_generation_from_env() -> Result<LlmModelConfig, AiLlmError> {
    resolve_profile(ProfileRole::Generation, env_opt)
}

/// Builds the embedding profile from the process environment.
///
/// # Errors
/// Missing credentials, unknown provider names, or malformed numbers.
pub fn config_embedding_from_env() -> Result<LlmModelConfig, AiLlmError> {
    resolve_profile(ProfileRole::Embedding, env_opt)
}

/// Resolves a profile against an arbitrary variable lookup.
///
/// `lookup` must return `None` for unset or empty variables.
pub fn resolve_profile<F>(role: ProfileRole, lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = match role {
        ProfileRole::Generation => lookup("LLM_KIND"),
        ProfileRole::Embedding => lookup("EMBEDDING_KIND").or_else(|| lookup("LLM_KIND")),
    };
    let provider = match kind {
        Some(k) => k.parse::<LlmProvider>()?,
        None => LlmProvider::Ollama,
    };

    let (endpoint, api_key, generation_model, embedding_model) = match provider {
        LlmProvider::Ollama => (
            ollama_endpoint(&lookup)?,
            None,
            lookup("OLLAMA_MODEL").unwrap_or_else(|| "qwen3:14b".into()),
            "nomic-embed-text",
        ),
        LlmProvider::OpenAI => (
            lookup("OPENAI_URL").unwrap_or_else(|| "https://api.openai.com".into()),
            Some(
                lookup("OPENAI_API_KEY")
                    .ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?,
            ),
            lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            "text-embedding-3-small",
        ),
        LlmProvider::Gemini => (
            lookup("GEMINI_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".into()),
            Some(
                lookup("GEMINI_API_KEY")
                    .ok_or(ConfigError::MissingVar("GEMINI_API_KEY"))?,
            ),
            lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".into()),
            "text-embedding-004",
        ),
    };
    validate_http_endpoint(endpoint_var(provider), &endpoint)?;

    let timeout_secs = parse_num::<u64, _>(&lookup, "LLM_TIMEOUT_SECS", "expected u64")?;

    let cfg = match role {
        ProfileRole::Generation => LlmModelConfig {
            provider,
            model: generation_model,
            endpoint,
            api_key,
            max_tokens: parse_num::<u32, _>(&lookup, "LLM_MAX_TOKENS", "expected u32")?,
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        },
        ProfileRole::Embedding => LlmModelConfig {
            provider,
            model: lookup("EMBEDDING_MODEL").unwrap_or_else(|| embedding_model.into()),
            endpoint,
            api_key,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(timeout_secs.unwrap_or(EMBEDDING_TIMEOUT_SECS)),
        },
    };

    Ok(cfg)
}

/// Resolves the Ollama endpoint.
///
/// Precedence: `OLLAMA_URL`, then `OLLAMA_PORT` → `http://localhost:{port}`,
/// then `http://localhost:11434`.
fn ollama_endpoint<F>(lookup: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = lookup("OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok("http://localhost:11434".into())
}

fn endpoint_var(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Ollama => "OLLAMA_URL",
        LlmProvider::OpenAI => "OPENAI_URL",
        LlmProvider::Gemini => "GEMINI_URL",
    }
}

fn parse_num<T, F>(
    lookup: &F,
    var: &'static str,
    reason: &'static str,
) -> Result<Option<T>, AiLlmError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, reason }.into()),
        None => Ok(None),
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
    fn defaults_to_local_ollama() {
        let cfg = resolve_profile(ProfileRole::Generation, env_of(&[])).unwrap();
        assert_eq!(cfg.provider, LlmProvider::Ollama);
        assert_eq!(cfg.endpoint, "http://localhost:11434");
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn ollama_port_builds_localhost_url() {
        let cfg =
            resolve_profile(ProfileRole::Embedding, env_of(&[("OLLAMA_PORT", "9999")])).unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:9999");
        assert_eq!(cfg.model, "nomic-embed-text");
    }

    #[test]
    fn embedding_kind_overrides_llm_kind() {
        let env = env_of(&[
            ("LLM_KIND", "ollama"),
            ("EMBEDDING_KIND", "gemini"),
            ("GEMINI_API_KEY", "k"),
        ]);
        let gen_cfg = resolve_profile(ProfileRole::Generation, &env).unwrap();
        let emb_cfg = resolve_profile(ProfileRole::Embedding, &env).unwrap();
        assert_eq!(gen_cfg.provider, LlmProvider::Ollama);
        assert_eq!(emb_cfg.provider, LlmProvider::Gemini);
        assert_eq!(emb_cfg.model, "text-embedding-004");
    }

    #[test]
    fn hosted_providers_require_api_key() {
        let err = resolve_profile(ProfileRole::Generation, env_of(&[("LLM_KIND", "openai")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn malformed_numbers_fail() {
        let err = resolve_profile(
            ProfileRole::Generation,
            env_of(&[("LLM_MAX_TOKENS", "lots")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("LLM_MAX_TOKENS"));
    }
}
