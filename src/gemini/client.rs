// Gemini API client (API-key auth, generativelanguage v1beta)

use crate::config::GeminiConfig;
use crate::error::{NanoBananaError, Result};
use crate::models::gemini::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::models::mapping::resolve_model;
use crate::utils::logging::sanitize;
use crate::workflow::ModelChoice;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error};
use zeroize::Zeroizing;

/// Client for the Google Gemini API.
///
/// Holds the HTTP connection pool, the endpoint settings and the API key.
/// The key is wiped from memory when the client is dropped.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    api_key: Zeroizing<String>,
}

impl GeminiClient {
    /// Create a new client from configuration.
    ///
    /// An empty API key is accepted here; generation reports it instead.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls();

        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| NanoBananaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            api_key: Zeroizing::new(config.api_key.trim().to_string()),
            config: config.clone(),
        })
    }

    /// Replace the configured key (e.g. one passed on the command line).
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Zeroizing::new(api_key.into().trim().to_string());
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Backend model name for a selector, honouring configured overrides.
    pub fn resolve_model(&self, choice: ModelChoice) -> String {
        resolve_model(choice, &self.config.model_overrides)
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base_url.trim_end_matches('/'),
            model,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Call Gemini `generateContent` once.
    ///
    /// Non-success statuses become [`NanoBananaError::Api`] carrying the
    /// message from the error body, or the status text when the body has none.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
        model: &str,
    ) -> Result<GenerateContentResponse> {
        if !self.has_api_key() {
            return Err(NanoBananaError::MissingApiKey);
        }

        let url = self.endpoint(model);
        debug!("Calling generateContent: {}", sanitize(&url));

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                sanitize(&error_text)
            );
            let message =
                Self::extract_error_message(&error_text).unwrap_or_else(|| status_text(status));
            return Err(NanoBananaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response_text = response.text().await?;

        debug!(
            "Raw Gemini response (first 200 chars): {}",
            response_text.chars().take(200).collect::<String>()
        );

        let gemini_response: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                error!("Failed to parse Gemini response: {}", e);
                NanoBananaError::Json(e)
            })?;

        Ok(gemini_response)
    }

    /// Extract error message from API response JSON
    pub fn extract_error_message(response_text: &str) -> Option<String> {
        let body: ApiErrorBody = serde_json::from_str(response_text).ok()?;
        body.error?
            .message
            .filter(|message| !message.trim().is_empty())
    }
}

/// Reason phrase for a status, e.g. "Too Many Requests".
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}
