//! Structured logging and key-redaction utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats, and keeps Google API keys out of
//! anything that gets logged.

use crate::config::LoggingConfig;
use crate::error::{NanoBananaError, Result};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static SANITIZE_ENABLED: OnceCell<bool> = OnceCell::new();

// Google API keys: "AIza" followed by 35 URL-safe characters.
static API_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{35}").expect("static pattern"));

static KEY_PARAM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&]key=)[^&\s#]*").expect("static pattern"));

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let _ = SANITIZE_ENABLED.set(config.sanitize_keys);

    // Configure filter from environment or config file
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| NanoBananaError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    installed.map_err(|e| NanoBananaError::Config(format!("Failed to install logger: {}", e)))
}

/// Redacts API keys from a string before it is logged.
///
/// Both bare Google API keys (`AIza…`) and the value of any `key=` query
/// parameter are replaced. Returns the input unchanged when redaction was
/// switched off through [`LoggingConfig::sanitize_keys`].
pub fn sanitize(input: &str) -> String {
    if !SANITIZE_ENABLED.get().copied().unwrap_or(true) {
        return input.to_string();
    }

    let result = KEY_PARAM_PATTERN.replace_all(input, "${1}[REDACTED_API_KEY]");
    API_KEY_PATTERN
        .replace_all(&result, "[REDACTED_API_KEY]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_query_key() {
        let input = "https://host/v1beta/models/m:generateContent?key=secret-123&alt=json";
        let output = sanitize(input);
        assert_eq!(
            output,
            "https://host/v1beta/models/m:generateContent?key=[REDACTED_API_KEY]&alt=json"
        );
    }

    #[test]
    fn test_sanitize_bare_api_key() {
        let key = format!("AIza{}", "x".repeat(35));
        let output = sanitize(&format!("API key {} not valid", key));
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains(&key));
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("quota exceeded"), "quota exceeded");
    }
}
