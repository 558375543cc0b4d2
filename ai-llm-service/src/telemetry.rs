//! Log formatting shared by every crate of the docs assistant.
//!
//! The binary composes [`layer`] with [`env_filter_with_level`]; libraries
//! only emit `tracing` events and never install a subscriber themselves.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Targets owned by this workspace.
pub const TARGET_PREFIXES: &[&str] = &[
    "ai_llm_service",
    "doc_store",
    "answer_engine",
    "api",
    "docs_assistant_backend",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Compact single-line formatting layer.
///
/// - RFC3339 UTC timestamps
/// - `file:line` and target
/// - span close events, so `#[instrument]`ed calls report their duration
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
}

/// Directive string raising workspace crates to `level`,
/// e.g. `ai_llm_service=debug,doc_store=debug,...`.
pub fn level_directives(level: Level) -> String {
    let lvl = level.as_str().to_lowercase();
    TARGET_PREFIXES
        .iter()
        .map(|t| format!("{t}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` when set; otherwise `default` globally and `level` for workspace crates.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default},{}", level_directives(level))))
}
