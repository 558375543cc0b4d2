//! POST /api/search: answers a question from the indexed API docs.

use std::sync::Arc;

use answer_engine::StructuredAnswer;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::search::search_request::SearchRequest,
};

pub const MISSING_QUESTION: &str = "Missing query parameter";

/// Handler: POST /api/search
///
/// Low-confidence lookups still answer 200 with the fallback content.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/search \
///   -H 'content-type: application/json' \
///   -d '{"question":"Show me a curl example for creating an order","prev":["What is an order?"]}'
/// ```
#[instrument(skip_all)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<StructuredAnswer>> {
    let Json(body) = payload?;
    let question = body
        .question()
        .ok_or_else(|| AppError::BadRequest(MISSING_QUESTION.into()))?;
    let prev = body.prev.as_deref().unwrap_or_default();

    let outcome = state.assistant.ask(question, prev).await?;
    info!(confident = outcome.is_confident(), "search answered");

    Ok(Json(outcome.into_answer()))
}
