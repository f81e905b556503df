//! Logging initialization with environment variable support

use crate::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the tracing subscriber
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_LEVEL`: Set log level (trace, debug, info, warn, error)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Logs always go to stderr; stdout carries generated code.
///
/// ```bash
/// LOG_LEVEL=debug structspec gen --src ./models
/// RUST_LOG=structspec_lang_go=debug structspec gen --src ./models
/// ```
pub fn initialize(config: &LoggingConfig) {
    let format = resolve_format(std::env::var("LOG_FORMAT").ok().as_deref(), config.format);
    let log_level = resolve_level(std::env::var("LOG_LEVEL").ok().as_deref(), &config.level);

    // Directives from RUST_LOG replace the default level
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Span wrapping one generation run so nested events carry its source directory
pub fn generate_span(src: &std::path::Path) -> tracing::Span {
    tracing::info_span!("generate", src = %src.display())
}

fn resolve_level(env_level: Option<&str>, configured: &str) -> LevelFilter {
    env_level
        .and_then(|level| level.parse::<tracing::Level>().ok())
        .or_else(|| configured.parse::<tracing::Level>().ok())
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::WARN)
}

fn resolve_format(env_format: Option<&str>, configured: LogFormat) -> LogFormat {
    env_format
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or(configured)
}
