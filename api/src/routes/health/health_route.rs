//! GET /health: liveness plus a probe of each configured LLM backend.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<HealthStatus>,
}

/// Handler: GET /health
///
/// Always 200; provider failures are reported per entry.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let providers = match &state.llm {
        Some(llm) => llm.health_all().await,
        None => Vec::new(),
    };
    Json(HealthResponse {
        status: "ok",
        providers,
    })
}
