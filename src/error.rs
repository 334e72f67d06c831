use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::audio::ConvertError;
use crate::translate::TranslateError;

/// Errors surfaced to the user for one transcription request
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed range '{input}': {reason}")]
    MalformedRange { input: String, reason: String },

    #[error("Please upload an audio file")]
    NoFileProvided,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Recording is {duration:.2}s long, accepted range is [{min}, {max}] seconds")]
    DurationOutOfBounds { duration: f64, min: f64, max: f64 },

    #[error("Transcription failed: {0}")]
    TranscriptionFailure(String),

    #[error("Audio conversion failed: {0}")]
    ConversionFailure(#[from] ConvertError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn malformed_range(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRange {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedRange { .. }
            | AppError::NoFileProvided
            | AppError::UnsupportedLanguage(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::DurationOutOfBounds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TranscriptionFailure(_) | AppError::ConversionFailure(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

// Translation errors are reported under the transcription failure kind
impl From<TranslateError> for AppError {
    fn from(err: TranslateError) -> Self {
        AppError::TranscriptionFailure(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
