use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::audio::AudioAsset;

/// Request body fields understood by the speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ASRRequest {
    pub model: String,
    pub language: Option<String>,
    /// Start of the window in seconds; absent for whole-file requests
    pub offset: Option<f64>,
    /// Length of the window in seconds
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ASRResponse {
    pub text: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Speech-to-text collaborator. Implementations own model selection; callers
/// only choose between the whole recording and a window of it.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the entire recording
    async fn transcribe(&self, audio: &AudioAsset) -> Result<String, anyhow::Error>;

    /// Transcribe `duration` seconds starting at `offset`
    async fn transcribe_range(
        &self,
        audio: &AudioAsset,
        offset: f64,
        duration: f64,
    ) -> Result<String, anyhow::Error>;

    /// Whether the backing model is reachable
    async fn is_ready(&self) -> bool {
        true
    }
}
