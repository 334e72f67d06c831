use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::asr::{ASRRequest, ASRResponse, Transcriber};
use crate::audio::AudioAsset;
use crate::config_manager::ASRConfig;

#[derive(Error, Debug)]
pub enum SpeechServiceError {
    #[error("speech service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("speech service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("speech service reported failure: {0}")]
    Rejected(String),
}

/// Client for the HTTP speech recognition service hosting the Whisper model
#[derive(Debug, Clone)]
pub struct SpeechServiceClient {
    client: Client,
    config: ASRConfig,
}

impl SpeechServiceClient {
    pub fn new(config: ASRConfig) -> Result<Self, SpeechServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn request(&self, offset: Option<f64>, duration: Option<f64>) -> ASRRequest {
        ASRRequest {
            model: self.config.model.clone(),
            language: self.config.language.clone(),
            offset,
            duration,
        }
    }

    /// Upload WAV bytes with the request fields as multipart form data
    pub async fn transcribe_wav(
        &self,
        wav: &[u8],
        request: ASRRequest,
    ) -> Result<String, SpeechServiceError> {
        let url = self.config.transcribe_url();

        let file = Part::bytes(wav.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let mut form = Form::new()
            .part("file", file)
            .text("model", request.model);
        if let Some(language) = request.language {
            form = form.text("language", language);
        }
        if let Some(offset) = request.offset {
            form = form.text("offset", offset.to_string());
        }
        if let Some(duration) = request.duration {
            form = form.text("duration", duration.to_string());
        }

        debug!(
            "POST {} ({} bytes, offset={:?}, duration={:?})",
            url,
            wav.len(),
            request.offset,
            request.duration
        );
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: ASRResponse = response.json().await?;
        if result.success {
            Ok(result.text.trim().to_string())
        } else {
            Err(SpeechServiceError::Rejected(
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }

    pub async fn health_check(&self) -> Result<bool, SpeechServiceError> {
        let response = self.client.get(self.config.health_url()).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl Transcriber for SpeechServiceClient {
    async fn transcribe(&self, audio: &AudioAsset) -> Result<String, anyhow::Error> {
        let request = self.request(None, None);
        Ok(self.transcribe_wav(audio.wav_bytes(), request).await?)
    }

    async fn transcribe_range(
        &self,
        audio: &AudioAsset,
        offset: f64,
        duration: f64,
    ) -> Result<String, anyhow::Error> {
        let request = self.request(Some(offset), Some(duration));
        Ok(self.transcribe_wav(audio.wav_bytes(), request).await?)
    }

    async fn is_ready(&self) -> bool {
        match self.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!("Speech service health check failed: {}", e);
                false
            }
        }
    }
}
