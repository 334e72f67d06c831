use std::sync::Arc;
use std::time::Duration;

use crate::asr::Transcriber;
use crate::audio::FfmpegConverter;
use crate::config_manager::Config;
use crate::speech_service::SpeechServiceClient;

/// Read-only collaborators shared by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub transcriber: Arc<dyn Transcriber>,
    pub converter: FfmpegConverter,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let speech_service = SpeechServiceClient::new(config.asr_config.clone())?;
        Self::with_transcriber(config, Arc::new(speech_service))
    }

    pub fn with_transcriber(
        config: Config,
        transcriber: Arc<dyn Transcriber>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.translate_config.timeout_secs))
            .build()?;
        let mut converter = FfmpegConverter::new(config.audio_config.ffmpeg_path.clone());
        if let Some(dir) = &config.audio_config.scratch_dir {
            converter = converter.with_scratch_dir(dir);
        }

        Ok(Self {
            config: Arc::new(config),
            transcriber,
            converter,
            http,
        })
    }
}
