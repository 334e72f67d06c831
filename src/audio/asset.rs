use std::io::Cursor;
use tracing::{debug, info};

use super::converter::{ConvertError, FfmpegConverter, TargetFormat};
use crate::config_manager::AudioConfig;
use crate::error::AppError;

/// A decoded recording: mono 16-bit PCM WAV plus its measured length
#[derive(Debug, Clone)]
pub struct AudioAsset {
    wav: Vec<u8>,
    duration_secs: f64,
}

impl AudioAsset {
    /// Wrap WAV bytes, measuring duration from the header
    pub fn from_wav(wav: Vec<u8>) -> Result<Self, ConvertError> {
        let duration_secs = measure_wav_duration(&wav)?;
        Ok(Self { wav, duration_secs })
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }
}

/// Frames divided by sample rate
pub fn measure_wav_duration(wav: &[u8]) -> Result<f64, hound::Error> {
    let reader = hound::WavReader::new(Cursor::new(wav))?;
    let spec = reader.spec();
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// True when the bytes already are WAV in the layout the speech service wants
pub fn matches_target(wav: &[u8], format: TargetFormat) -> bool {
    match hound::WavReader::new(Cursor::new(wav)) {
        Ok(reader) => {
            let spec = reader.spec();
            spec.sample_rate == format.sample_rate
                && spec.channels == format.channels
                && spec.bits_per_sample == 16
                && spec.sample_format == hound::SampleFormat::Int
        }
        Err(_) => false,
    }
}

/// Turn an uploaded file into an [`AudioAsset`]: check the extension, convert
/// when needed, measure, and enforce the configured duration bounds.
pub async fn load_upload(
    file_name: &str,
    bytes: Vec<u8>,
    config: &AudioConfig,
    converter: &FfmpegConverter,
) -> Result<AudioAsset, AppError> {
    if !config.accepts(file_name) {
        return Err(AppError::UnsupportedFormat(file_name.to_string()));
    }

    let format = TargetFormat::mono(config.sample_rate);
    let wav = if matches_target(&bytes, format) {
        debug!("{} is already {} Hz mono WAV", file_name, format.sample_rate);
        bytes
    } else {
        let ext = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        converter.convert(&bytes, ext, format).await?
    };

    let asset = AudioAsset::from_wav(wav)?;
    let duration = asset.duration_secs();
    if duration < config.min_duration_secs || duration > config.max_duration_secs {
        return Err(AppError::DurationOutOfBounds {
            duration,
            min: config.min_duration_secs,
            max: config.max_duration_secs,
        });
    }

    info!("Loaded {} ({:.2}s)", file_name, duration);
    Ok(asset)
}
