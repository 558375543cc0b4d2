use std::process::ExitCode;

use ai_llm_service::telemetry;
use tracing::{Level, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; real deployments pass variables directly.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::DEBUG))
        .with(telemetry::layer())
        .init();

    if let Err(err) = dotenv {
        tracing::debug!(error = %err, "no .env loaded");
    }

    match api::start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "docs assistant failed");
            ExitCode::FAILURE
        }
    }
}
