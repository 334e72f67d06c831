use serde::{Deserialize, Serialize};

/// Audio intake settings: conversion tool and accepted recordings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(rename = "ffmpeg_path")]
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(rename = "sample_rate")]
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(rename = "min_duration_secs")]
    #[serde(default)]
    pub min_duration_secs: f64,

    #[serde(rename = "max_duration_secs")]
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: f64,

    #[serde(rename = "allowed_extensions")]
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Where conversion temp files go; the system temp dir when unset
    #[serde(rename = "scratch_dir")]
    #[serde(default)]
    pub scratch_dir: Option<String>,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_max_duration_secs() -> f64 {
    3600.0
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["wav".to_string(), "mp3".to_string(), "m4a".to_string()]
}

impl AudioConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sample_rate == 0 {
            anyhow::bail!("sample_rate must be greater than zero");
        }
        if self.min_duration_secs < 0.0 || self.min_duration_secs > self.max_duration_secs {
            anyhow::bail!(
                "invalid duration bounds [{}, {}]",
                self.min_duration_secs,
                self.max_duration_secs
            );
        }
        if self.allowed_extensions.is_empty() {
            anyhow::bail!("allowed_extensions must not be empty");
        }
        Ok(())
    }

    /// Case-insensitive check of a file name's extension
    pub fn accepts(&self, file_name: &str) -> bool {
        let ext = match std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
        {
            Some(ext) => ext.to_lowercase(),
            None => return false,
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            sample_rate: default_sample_rate(),
            min_duration_secs: 0.0,
            max_duration_secs: default_max_duration_secs(),
            allowed_extensions: default_allowed_extensions(),
            scratch_dir: None,
        }
    }
}
