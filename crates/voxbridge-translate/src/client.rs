use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{TranslateConfig, TranslateResponse};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Translation failed: {status} - {body}")]
    Upload { status: StatusCode, body: String },

    #[error("Translation succeeded but no output audio URL was returned")]
    MalformedResponse,

    #[error("Upload request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Seam between the session loop and the network, so tests can swap in
/// a recording fake. One call per finalized utterance.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        audio: Vec<u8>,
        target_language_code: &str,
    ) -> Result<String, TranslateError>;
}

/// HTTP client for the speech-to-speech-translate endpoint.
pub struct TranslateClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TranslateClient {
    pub fn new(config: &TranslateConfig) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Uploader for TranslateClient {
    async fn upload(
        &self,
        audio: Vec<u8>,
        target_language_code: &str,
    ) -> Result<String, TranslateError> {
        let size = audio.len();
        let part = Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .part("audio", part)
            .text("target_language_code", target_language_code.to_string());

        tracing::debug!(bytes = size, language = target_language_code, "Uploading utterance");

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Upload { status, body });
        }

        let parsed: TranslateResponse = response.json().await?;
        match parsed.output_audio_url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(TranslateError::MalformedResponse),
        }
    }
}
