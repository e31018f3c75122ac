use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use voxbridge_translate::TranslateConfig;
use voxbridge_vad::VadConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vad: VadConfig,
    pub translate: TranslateConfig,
    /// Language code sent with each upload, e.g. "hi-IN". Read at the
    /// moment a clip is finalized, so it can be changed while a
    /// recording is in progress.
    pub target_language: String,
    /// Input device name; `None` uses the host default.
    pub input_device: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vad: VadConfig::default(),
            translate: TranslateConfig::default(),
            target_language: "hi-IN".to_string(),
            input_device: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                let config = toml::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.target_language, "hi-IN");
        assert_eq!(cfg.vad.start_threshold, 30.0);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let text = r#"
            target_language = "ta-IN"

            [vad]
            start_threshold = 35.0
            stop_threshold = 25.0
            min_speech_duration_ms = 500
            min_silence_duration_ms = 2000
            frequency_bins = 256
        "#;
        let cfg: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(cfg.target_language, "ta-IN");
        assert_eq!(cfg.vad.start_threshold, 35.0);
        assert_eq!(cfg.translate.timeout_secs, 30);
    }
}
