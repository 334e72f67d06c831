use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("converter produced no output")]
    EmptyOutput,
    #[error("invalid WAV data: {0}")]
    InvalidWav(#[from] hound::Error),
}

/// PCM WAV layout the speech service expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl TargetFormat {
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }
}

/// Shells out to ffmpeg. Input and output go through temporary files because
/// mp4-family containers cannot be probed from a pipe.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    program: String,
    scratch_dir: PathBuf,
}

impl FfmpegConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Convert `input` (any container ffmpeg understands) to 16-bit PCM WAV.
    /// `extension_hint` helps ffmpeg pick a demuxer, e.g. "m4a".
    pub async fn convert(
        &self,
        input: &[u8],
        extension_hint: &str,
        format: TargetFormat,
    ) -> Result<Vec<u8>, ConvertError> {
        let id = Uuid::new_v4().simple().to_string();
        let input_path = ScratchFile(self.scratch_dir.join(format!(
            "upload-{}.{}",
            id,
            sanitize_extension(extension_hint)
        )));
        let output_path = ScratchFile(self.scratch_dir.join(format!("converted-{}.wav", id)));

        tokio::fs::write(&input_path.0, input).await?;

        let args = ffmpeg_args(&input_path.0, &output_path.0, format);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("{} exited with {}: {}", self.program, output.status, stderr);
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let converted = tokio::fs::read(&output_path.0).await?;
        if converted.is_empty() {
            return Err(ConvertError::EmptyOutput);
        }
        debug!("Converted {} bytes into {} bytes of WAV", input.len(), converted.len());
        Ok(converted)
    }
}

/// Removes the file when the conversion finishes, successfully or not
struct ScratchFile(PathBuf);

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.0.exists() {
            if let Err(e) = std::fs::remove_file(&self.0) {
                debug!("Could not remove scratch file {:?}: {}", self.0, e);
            }
        }
    }
}

fn sanitize_extension(hint: &str) -> String {
    let ext: String = hint
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();
    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext.to_lowercase()
    }
}

fn ffmpeg_args(input: &Path, output: &Path, format: TargetFormat) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostdin".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-vn".to_string(),
        "-ac".to_string(),
        format.channels.to_string(),
        "-ar".to_string(),
        format.sample_rate.to_string(),
        "-c:a".to_string(),
        "pcm_s16le".to_string(),
        "-f".to_string(),
        "wav".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}
