use serde::{Deserialize, Serialize};

use crate::config_manager::asr::ASRConfig;
use crate::config_manager::audio::AudioConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translate::TranslateConfig;

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "asr_config")]
    #[serde(default)]
    pub asr_config: ASRConfig,

    #[serde(rename = "translate_config")]
    #[serde(default)]
    pub translate_config: TranslateConfig,

    #[serde(rename = "audio_config")]
    #[serde(default)]
    pub audio_config: AudioConfig,
}

impl Config {
    /// Load configuration from a YAML or JSON(-LD) file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config_file, validate_config};
        let value = read_config_file(path)?;
        let config = validate_config(&value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        self.system_config.validate()?;
        self.audio_config.validate()?;
        self.translate_config.validate()?;
        Ok(())
    }
}
