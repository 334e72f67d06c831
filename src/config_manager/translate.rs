use serde::{Deserialize, Serialize};

/// Configuration for the translation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(rename = "source_language")]
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// The endpoint refuses payloads over 5000 characters
    #[serde(rename = "max_chunk_chars")]
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_source_language() -> String {
    crate::translate::AUTO.to_string()
}

fn default_max_chunk_chars() -> usize {
    4500
}

fn default_timeout_secs() -> u64 {
    30
}

impl TranslateConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_chunk_chars == 0 || self.max_chunk_chars > 5000 {
            anyhow::bail!(
                "max_chunk_chars must be between 1 and 5000, got {}",
                self.max_chunk_chars
            );
        }
        Ok(())
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            source_language: default_source_language(),
            max_chunk_chars: default_max_chunk_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
