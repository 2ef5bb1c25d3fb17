// Error types for the inpainting workflow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NanoBananaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("API Key is required")]
    MissingApiKey,

    /// Non-success response from the generation endpoint.
    /// Displays exactly as the message surfaced to the user.
    #[error("API Error: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Canvas error: {0}")]
    Canvas(String),
}

impl NanoBananaError {
    /// HTTP status carried by the error, if it came from the endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            NanoBananaError::Api { status, .. } => Some(*status),
            NanoBananaError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NanoBananaError>;
