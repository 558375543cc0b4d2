//! POST /api/embedding: stores one documentation summary.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::embedding::embedding_request::{EmbeddingRequest, EmbeddingResponse},
};

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const STORED: &str = "Embedding stored successfully";

/// Handler: POST /api/embedding
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/embedding \
///   -H 'content-type: application/json' \
///   -d '{"summary":"GET /orders lists orders. Requires a bearer token."}'
/// ```
#[instrument(skip_all)]
pub async fn store_embedding(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmbeddingRequest>, JsonRejection>,
) -> AppResult<Json<EmbeddingResponse>> {
    let Json(body) = payload?;
    let summary = body
        .summary()
        .ok_or_else(|| AppError::BadRequest(MISSING_FIELDS.into()))?;

    let id = state.writer.ingest(summary).await?;

    Ok(Json(EmbeddingResponse {
        message: STORED,
        id: id.to_string(),
    }))
}
