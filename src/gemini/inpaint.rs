//! Mask-guided inpainting over `generateContent`.
//!
//! One call per requested variation, issued strictly one after another. The
//! first non-success response ends the batch and keeps what earlier calls
//! produced; a transport or parsing failure ends it with nothing. Neither is
//! returned as an `Err`: callers always receive a [`GenerationOutcome`].

use super::GeminiClient;
use crate::error::NanoBananaError;
use crate::models::gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::workflow::{Mode, ModelChoice, Variation};
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Inputs for one generation batch.
#[derive(Debug, Clone)]
pub struct InpaintParams {
    pub model: ModelChoice,
    pub prompt: String,
    pub mode: Mode,
    /// Base64 PNG without a data-URL prefix.
    pub base_image: String,
    /// Base64 PNG without a data-URL prefix; white marks the area to edit.
    pub mask_image: String,
    /// Number of sequential calls. 0 is treated as 1.
    pub count: u32,
}

/// Uniform result of a batch, whatever went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    pub variations: Vec<Variation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationOutcome {
    pub fn succeeded(variations: Vec<Variation>) -> Self {
        Self {
            success: true,
            variations,
            error: None,
        }
    }

    pub fn failed(variations: Vec<Variation>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            variations,
            error: Some(error.into()),
        }
    }
}

/// Prefix the user's prompt with the instruction for `mode`.
pub fn build_instruction(mode: Mode, prompt: &str) -> String {
    match mode {
        Mode::Erase => format!("Remove or erase the masked area. {}", prompt),
        Mode::Replace => format!("Replace the masked area with: {}", prompt),
    }
}

/// Request body: instruction text, base image, mask image.
pub fn build_request(instruction: &str, base_image: &str, mask_image: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: None,
            parts: vec![
                Part::text(instruction),
                Part::png(base_image),
                Part::png(mask_image),
            ],
        }],
        generation_config: Some(GenerationConfig::text_and_image()),
    }
}

/// Appends one variation per image part of `response`.
///
/// Ids combine the wall clock with the call index; two images from the same
/// response share an id.
fn collect_variations(response: &GenerateContentResponse, call_index: u32, out: &mut Vec<Variation>) {
    for text in response.parts().filter_map(Part::as_text) {
        debug!("Model text part: {}", text.chars().take(200).collect::<String>());
    }

    let before = out.len();
    out.extend(response.images().map(|image| Variation {
        id: format!("variation-{}-{}", chrono::Utc::now().timestamp_millis(), call_index),
        data_url: image.to_data_url(),
    }));

    if out.len() == before {
        warn!("Call {} returned no image parts", call_index + 1);
    }
}

impl GeminiClient {
    /// Generate `params.count` inpainted variations of the masked area.
    pub async fn generate_inpainted_images(&self, params: &InpaintParams) -> GenerationOutcome {
        if !self.has_api_key() {
            warn!("Inpainting requested without an API key");
            return GenerationOutcome::failed(Vec::new(), NanoBananaError::MissingApiKey.to_string());
        }

        let model = self.resolve_model(params.model);
        let count = params.count.max(1);
        let instruction = build_instruction(params.mode, &params.prompt);
        let request = build_request(&instruction, &params.base_image, &params.mask_image);

        let span = info_span!(
            "inpaint",
            batch = %uuid::Uuid::new_v4().simple(),
            model = %model,
            mode = params.mode.as_str(),
            count
        );

        async move {
            let mut variations = Vec::new();

            for i in 0..count {
                debug!("Requesting variation {}/{}", i + 1, count);
                match self.generate_content(&request, &model).await {
                    Ok(response) => collect_variations(&response, i, &mut variations),
                    Err(err @ NanoBananaError::Api { .. }) => {
                        error!(
                            "Call {}/{} rejected, keeping {} earlier variation(s): {}",
                            i + 1,
                            count,
                            variations.len(),
                            err
                        );
                        return GenerationOutcome::failed(variations, err.to_string());
                    }
                    Err(err) => {
                        error!("Failed to generate inpainted images: {}", err);
                        return GenerationOutcome::failed(Vec::new(), err.to_string());
                    }
                }
            }

            info!("Generated {} variation(s) from {} call(s)", variations.len(), count);
            GenerationOutcome::succeeded(variations)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instruction_per_mode() {
        assert_eq!(
            build_instruction(Mode::Replace, "add a hat"),
            "Replace the masked area with: add a hat"
        );
        assert_eq!(
            build_instruction(Mode::Erase, "the lamp post"),
            "Remove or erase the masked area. the lamp post"
        );
    }

    #[test]
    fn test_request_carries_both_images() {
        let request = build_request("Replace the masked area with: sky", "BASE", "MASK");
        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Replace the masked area with: sky");
        assert_eq!(parts[1]["inlineData"]["data"], "BASE");
        assert_eq!(parts[2]["inlineData"]["data"], "MASK");
        assert_eq!(parts[2]["inlineData"]["mimeType"], "image/png");
        assert_eq!(value["generationConfig"]["responseModalities"], json!(["TEXT", "IMAGE"]));
    }

    #[test]
    fn test_collect_variations_ids_and_urls() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"text": "done"},
                {"inlineData": {"mimeType": "image/webp", "data": "UklG"}}
            ]}}]
        }))
        .unwrap();

        let mut out = Vec::new();
        collect_variations(&response, 2, &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].id.starts_with("variation-"));
        assert!(out[0].id.ends_with("-2"));
        assert_eq!(out[0].data_url, "data:image/webp;base64,UklG");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = GenerationOutcome::failed(Vec::new(), "API Key is required");
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": false, "variations": [], "error": "API Key is required"})
        );
        let outcome = GenerationOutcome::succeeded(vec![Variation {
            id: "variation-1-0".into(),
            data_url: "data:image/png;base64,AAA".into(),
        }]);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": true, "variations": [{"id": "variation-1-0", "dataURL": "data:image/png;base64,AAA"}]})
        );
    }
}
