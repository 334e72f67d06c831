use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::AppError;
use crate::handlers::{
    handle_probe, handle_transcription, Collaborators, ProbeOutcome, TranscriptionForm,
    TranscriptionOutcome, UploadedFile,
};
use crate::state::AppState;
use crate::translate::supported_languages;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // REST API routes
        .route("/api/languages", get(get_languages))
        .route("/api/probe", post(probe_audio))
        .route("/api/transcribe", post(transcribe_audio))

        // Static page
        .fallback_service(ServeDir::new(system_config.static_path()))
        .layer(DefaultBodyLimit::max(system_config.max_upload_bytes()))
}

/// Full application with middleware, ready to serve
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let speech_service = state.transcriber.is_ready().await;
    Json(json!({
        "status": "ok",
        "speech_service": speech_service
    }))
}

async fn get_languages() -> Json<Value> {
    Json(json!(supported_languages()))
}

async fn probe_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProbeOutcome>, AppError> {
    let form = read_form(multipart).await?;
    let outcome = handle_probe(form.file, &Collaborators::from_state(&state)).await?;
    Ok(Json(outcome))
}

async fn transcribe_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionOutcome>, AppError> {
    let form = read_form(multipart).await?;
    let outcome = handle_transcription(form, &Collaborators::from_state(&state)).await?;
    Ok(Json(outcome))
}

/// Collect the page's fields. Browsers submit an empty, unnamed file part when
/// nothing was chosen; that counts as no upload.
async fn read_form(mut multipart: Multipart) -> Result<TranscriptionForm, AppError> {
    let mut form = TranscriptionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.file = Some(UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "language" | "range" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if name == "language" {
                    form.language = Some(text);
                } else {
                    form.range = Some(text);
                }
            }
            other => debug!("Ignoring form field {:?}", other),
        }
    }

    Ok(form)
}
