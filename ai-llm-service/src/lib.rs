//! Shared LLM service: provider clients for text generation and embeddings.
//!
//! Construct [`service_profiles::LlmServiceProfiles`] once at startup, wrap it
//! in `Arc`, and hand clones to whatever needs to generate or embed.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
