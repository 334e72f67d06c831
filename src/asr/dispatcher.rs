use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::interface::Transcriber;
use crate::audio::AudioAsset;
use crate::error::AppError;

pub const RANGE_SEPARATOR: char = '-';

/// Window of a recording in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
}

impl Range {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether this range asks for the whole recording
    pub fn covers(&self, total_duration: f64) -> bool {
        self.start == 0.0 && self.end >= total_duration
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, RANGE_SEPARATOR, self.end)
    }
}

/// One user action: the recording, the window to transcribe, and the language
/// to translate into.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: AudioAsset,
    pub range: Range,
    pub target_language: String,
}

/// Value pre-filled in the range field. The end is rounded up to hundredths so
/// submitting it unchanged still selects the whole file.
pub fn default_range_input(total_duration: f64) -> String {
    let end = (total_duration * 100.0).ceil() / 100.0;
    format!("0{}{}", RANGE_SEPARATOR, end)
}

/// Parse `"<start>-<end>"` in seconds. `end` is not clamped to the recording;
/// anything at or past `total_duration` means "to the end of file".
pub fn parse_range(input: &str, total_duration: f64) -> Result<Range, AppError> {
    let range = parse_range_input(input)?;
    if range.end > total_duration {
        debug!(
            "Range end {} is past the {:.2}s recording, treating as end of file",
            range.end, total_duration
        );
    }
    Ok(range)
}

/// Syntax and ordering checks that need no knowledge of the recording
pub fn parse_range_input(input: &str) -> Result<Range, AppError> {
    let (start, end) = split_range(input.trim()).ok_or_else(|| {
        AppError::malformed_range(input, format!("expected <start>{}<end>", RANGE_SEPARATOR))
    })?;

    let start = parse_seconds(input, start)?;
    let end = parse_seconds(input, end)?;

    if start < 0.0 || end < 0.0 {
        return Err(AppError::malformed_range(input, "offsets must not be negative"));
    }
    if start > end {
        return Err(AppError::malformed_range(input, "start is after end"));
    }
    Ok(Range::new(start, end))
}

/// Split on the single separator. A `-` at the very start or right after an
/// exponent marker belongs to the number.
fn split_range(input: &str) -> Option<(&str, &str)> {
    let mut separator = None;
    let mut prev: Option<char> = None;
    for (i, c) in input.char_indices() {
        if c == RANGE_SEPARATOR && !matches!(prev, None | Some('e') | Some('E')) {
            if separator.is_some() {
                return None;
            }
            separator = Some(i);
        }
        prev = Some(c);
    }
    separator.map(|i| (&input[..i], &input[i + RANGE_SEPARATOR.len_utf8()..]))
}

fn parse_seconds(input: &str, token: &str) -> Result<f64, AppError> {
    let token = token.trim();
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AppError::malformed_range(
            input,
            format!("'{}' is not a number of seconds", token),
        )),
    }
}

/// Run whole-file or windowed transcription depending on the requested range.
/// Returns the raw transcript, before translation.
pub async fn dispatch(
    request: &TranscriptionRequest,
    transcriber: &dyn Transcriber,
) -> Result<String, AppError> {
    let total = request.audio.duration_secs();
    let range = request.range;

    if range.covers(total) {
        info!("Transcribing whole recording ({:.2}s)", total);
        return transcriber
            .transcribe(&request.audio)
            .await
            .map_err(transcription_failure);
    }

    let end = range.end.min(total);
    if range.start >= end {
        return Err(AppError::malformed_range(
            &range.to_string(),
            format!("selects nothing of the {:.2}s recording", total),
        ));
    }

    let length = end - range.start;
    info!("Transcribing {:.2}s starting at {:.2}s", length, range.start);
    transcriber
        .transcribe_range(&request.audio, range.start, length)
        .await
        .map_err(transcription_failure)
}

fn transcription_failure(err: anyhow::Error) -> AppError {
    AppError::TranscriptionFailure(format!("{:#}", err))
}
