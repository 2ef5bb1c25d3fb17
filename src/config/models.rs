//! Configuration data structures for the inpainting workflow.
//!
//! This module defines the schema for the application settings: the upstream
//! Gemini endpoint, logging, and the defaults used to seed a fresh workflow.

use crate::workflow::{ImageCount, Mode, ModelChoice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Upstream Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Defaults applied when the workflow record is created or reset.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Settings for the upstream Gemini API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter.
    /// Default: empty (generation then fails with "API Key is required").
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the Generative Language API.
    /// Default: `https://generativelanguage.googleapis.com/v1beta`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds. `None` leaves the transport default
    /// in place, which never times out.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Replaces entries of the built-in selector table, keyed by
    /// selector name (`auto`, `pro`, `flash`).
    #[serde(default)]
    pub model_overrides: HashMap<String, String>,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask API keys in logged URLs and messages.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_keys: bool,
}

/// Initial values for a fresh workflow record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub default_mode: Mode,

    #[serde(default)]
    pub default_model: ModelChoice,

    /// Clamped into [1, 4] when the record is seeded.
    #[serde(default = "default_image_count")]
    pub default_image_count: u8,
}

impl WorkflowConfig {
    pub fn image_count(&self) -> ImageCount {
        ImageCount::new(self.default_image_count)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            timeout_seconds: None,
            model_overrides: HashMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_keys: true,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::default(),
            default_model: ModelChoice::default(),
            default_image_count: default_image_count(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_image_count() -> u8 {
    1
}
