// Model selector mapping (settings menu → Gemini backend model)

use crate::workflow::ModelChoice;
use std::collections::HashMap;

/// Image-capable model every selector currently resolves to.
pub const IMAGE_GENERATION_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

/// Map a logical selector to its built-in backend model name.
///
/// All three selectors share one backend; `gemini.model_overrides`
/// repoints them.
pub fn map_model(choice: ModelChoice) -> &'static str {
    match choice {
        ModelChoice::Auto => IMAGE_GENERATION_MODEL,
        ModelChoice::Pro => IMAGE_GENERATION_MODEL,
        ModelChoice::Flash => IMAGE_GENERATION_MODEL,
    }
}

/// Like [`map_model`], but lets `overrides` (keyed by selector name) win.
/// Blank override values are ignored.
pub fn resolve_model(choice: ModelChoice, overrides: &HashMap<String, String>) -> String {
    overrides
        .get(choice.as_str())
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| map_model(choice))
        .to_string()
}
