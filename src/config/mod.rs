// Configuration module

mod models;

pub use models::*;

use crate::error::{NanoBananaError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest, prefix `NANOBANANA__`)
    /// 2. Config file
    /// 3. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_path())
    }

    /// Same as [`AppConfig::load`] but reads the file layer from `path`.
    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("NANOBANANA")
                    .separator("__")
            )
            .build()
            .map_err(|e| NanoBananaError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| NanoBananaError::Config(e.to_string()))
    }

    /// Render the effective configuration as TOML, with the API key masked.
    pub fn to_toml_string(&self) -> Result<String> {
        let mut shown = self.clone();
        if !shown.gemini.api_key.is_empty() {
            shown.gemini.api_key = "[REDACTED]".to_string();
        }
        toml::to_string_pretty(&shown).map_err(|e| NanoBananaError::Config(e.to_string()))
    }

    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nanobanana")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Mode, ModelChoice};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(
            config.gemini.api_base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert!(config.gemini.api_key.is_empty());
        assert!(config.gemini.timeout_seconds.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.workflow.default_mode, Mode::Replace);
        assert_eq!(config.workflow.default_model, ModelChoice::Auto);
        assert_eq!(config.workflow.image_count().get(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[gemini]
api_key = "file-key"
timeout_seconds = 30

[gemini.model_overrides]
pro = "gemini-3-pro-image-preview"

[workflow]
default_mode = "erase"
default_model = "flash"
default_image_count = 9
"#
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.gemini.api_key, "file-key");
        assert_eq!(config.gemini.timeout_seconds, Some(30));
        assert_eq!(
            config.gemini.model_overrides.get("pro").map(String::as_str),
            Some("gemini-3-pro-image-preview")
        );
        assert_eq!(config.workflow.default_mode, Mode::Erase);
        assert_eq!(config.workflow.default_model, ModelChoice::Flash);
        // Out-of-range counts are clamped when seeding, not rejected.
        assert_eq!(config.workflow.image_count().get(), 4);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_toml_output_masks_key() {
        let mut config = AppConfig::default();
        config.gemini.api_key = "AIzaSecret".to_string();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("AIzaSecret"));
    }
}
