use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Success payload from the translation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub output_audio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Full URL of the speech-to-speech-translate endpoint.
    pub endpoint: String,
    /// Upper bound on one upload round trip; expiry is reported as a
    /// non-fatal error, never retried automatically.
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/speech-to-speech-translate/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TranslateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
