//! HTTP surface of the docs assistant.
//!
//! - `POST /api/search`    → answer a question from the indexed docs
//! - `POST /api/embedding` → index one documentation summary
//! - `GET  /health`        → liveness and provider probes

pub mod core;
pub mod error_handler;
mod routes;

use std::{env, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;
use crate::routes::{
    embedding::embedding_route::store_embedding, health::health_route::health,
    search::search_route::search,
};

const DEFAULT_ADDRESS: &str = "0.0.0.0:3000";

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/embedding", post(store_embedding))
        .route("/health", get(health))
        .with_state(state)
}

/// Builds state from the environment and serves until Ctrl+C.
///
/// `API_ADDRESS` overrides the default `0.0.0.0:3000` bind address.
pub async fn start() -> Result<(), AppError> {
    let address = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
    let state = Arc::new(AppState::from_env()?);

    let listener = TcpListener::bind(&address).await.map_err(AppError::Bind)?;
    info!(%address, "docs assistant listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
