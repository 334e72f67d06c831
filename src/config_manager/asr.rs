use serde::{Deserialize, Serialize};

/// Configuration for the external speech recognition service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ASRConfig {
    #[serde(rename = "service_url")]
    #[serde(default = "default_service_url")]
    pub service_url: String,

    #[serde(rename = "transcribe_path")]
    #[serde(default = "default_transcribe_path")]
    pub transcribe_path: String,

    /// Whisper model name forwarded to the service
    #[serde(default = "default_model")]
    pub model: String,

    /// Spoken language hint; `None` lets the model detect it
    #[serde(default)]
    pub language: Option<String>,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_transcribe_path() -> String {
    "/asr/transcribe".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl ASRConfig {
    pub fn transcribe_url(&self) -> String {
        format!(
            "{}/{}",
            self.service_url.trim_end_matches('/'),
            self.transcribe_path.trim_start_matches('/')
        )
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.service_url.trim_end_matches('/'))
    }
}

impl Default for ASRConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            transcribe_path: default_transcribe_path(),
            model: default_model(),
            language: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
