use reqwest::Client;
use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::asr::{
    default_range_input, dispatch, parse_range, parse_range_input, Range, Transcriber,
    TranscriptionRequest,
};
use crate::audio::{load_upload, FfmpegConverter};
use crate::config_manager::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::translate::{resolve_code, translate};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Inputs of the trigger action, as submitted by the page
#[derive(Debug, Clone, Default)]
pub struct TranscriptionForm {
    pub file: Option<UploadedFile>,
    /// Display name or code of the target language
    pub language: Option<String>,
    /// `"<start>-<end>"`; blank means the whole recording
    pub range: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionOutcome {
    pub transcript: String,
    pub translation: String,
    pub language: String,
    pub range: Range,
    pub duration: f64,
    pub full_file: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub duration: f64,
    pub default_range: String,
}

/// Everything a request needs, passed explicitly
pub struct Collaborators<'a> {
    pub config: &'a Config,
    pub transcriber: &'a dyn Transcriber,
    pub converter: &'a FfmpegConverter,
    pub http: &'a Client,
}

impl<'a> Collaborators<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            config: &state.config,
            transcriber: state.transcriber.as_ref(),
            converter: &state.converter,
            http: &state.http,
        }
    }
}

/// Upload -> range check -> transcription -> translation
pub async fn handle_transcription(
    form: TranscriptionForm,
    deps: &Collaborators<'_>,
) -> Result<TranscriptionOutcome, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("transcription", %request_id);
    run_transcription(form, deps).instrument(span).await
}

async fn run_transcription(
    form: TranscriptionForm,
    deps: &Collaborators<'_>,
) -> Result<TranscriptionOutcome, AppError> {
    let file = form.file.ok_or(AppError::NoFileProvided)?;

    let selection = form.language.unwrap_or_default();
    let target = resolve_code(&selection)
        .ok_or_else(|| AppError::UnsupportedLanguage(selection.clone()))?;

    let range_input = form.range.as_deref().map(str::trim).filter(|r| !r.is_empty());
    // Reject bad input before paying for a conversion
    if let Some(input) = range_input {
        parse_range_input(input)?;
    }

    let audio = load_upload(&file.file_name, file.bytes, &deps.config.audio_config, deps.converter).await?;
    let duration = audio.duration_secs();

    let range = match range_input {
        Some(input) => parse_range(input, duration)?,
        None => Range::new(0.0, duration),
    };

    let request = TranscriptionRequest {
        audio,
        range,
        target_language: target.to_string(),
    };
    let full_file = request.range.covers(duration);
    let transcript = dispatch(&request, deps.transcriber).await?;

    let translation = translate(
        deps.http,
        &deps.config.translate_config,
        &transcript,
        &deps.config.translate_config.source_language,
        &request.target_language,
    )
    .await?;

    info!(
        "Translated {} transcript chars into {} ({} chars)",
        transcript.chars().count(),
        request.target_language,
        translation.chars().count()
    );

    Ok(TranscriptionOutcome {
        transcript,
        translation,
        language: request.target_language,
        range: request.range,
        duration,
        full_file,
    })
}

/// Measure an upload so the page can pre-fill the range field
pub async fn handle_probe(
    file: Option<UploadedFile>,
    deps: &Collaborators<'_>,
) -> Result<ProbeOutcome, AppError> {
    let file = file.ok_or(AppError::NoFileProvided)?;
    let audio = load_upload(&file.file_name, file.bytes, &deps.config.audio_config, deps.converter).await?;
    let duration = audio.duration_secs();

    Ok(ProbeOutcome {
        duration,
        default_range: default_range_input(duration),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::TranslateConfig;
    use crate::test_support::{spawn_translate_stub, wav_fixture, Call, RecordingTranscriber};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixture {
        config: Config,
        transcriber: RecordingTranscriber,
        converter: FfmpegConverter,
        http: Client,
    }

    impl Fixture {
        fn new(endpoint: String) -> Self {
            Self {
                config: Config {
                    translate_config: TranslateConfig {
                        endpoint,
                        ..Default::default()
                    },
                    ..Default::default()
                },
                transcriber: RecordingTranscriber::default(),
                converter: FfmpegConverter::new("recording-translator-no-such-ffmpeg"),
                http: Client::new(),
            }
        }

        fn deps(&self) -> Collaborators<'_> {
            Collaborators {
                config: &self.config,
                transcriber: &self.transcriber,
                converter: &self.converter,
                http: &self.http,
            }
        }
    }

    fn form(secs: f64, language: &str, range: Option<&str>) -> TranscriptionForm {
        TranscriptionForm {
            file: Some(UploadedFile {
                file_name: "memo.wav".to_string(),
                bytes: wav_fixture(16000, 1, secs),
            }),
            language: Some(language.to_string()),
            range: range.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn missing_upload_invokes_no_collaborator() {
        let hits = Arc::new(AtomicUsize::new(0));
        let fixture = Fixture::new(spawn_translate_stub(hits.clone()).await);

        let err = handle_transcription(
            TranscriptionForm {
                file: None,
                language: Some("french".to_string()),
                range: Some("0-10".to_string()),
            },
            &fixture.deps(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NoFileProvided));
        assert!(fixture.transcriber.calls().is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn default_range_transcribes_whole_file_and_translates() {
        let hits = Arc::new(AtomicUsize::new(0));
        let fixture = Fixture::new(spawn_translate_stub(hits.clone()).await);

        let outcome = handle_transcription(form(10.0, "French", Some("0-10")), &fixture.deps())
            .await
            .unwrap();

        assert_eq!(fixture.transcriber.calls(), vec![Call::Full]);
        assert_eq!(outcome.transcript, "full transcript");
        assert_eq!(outcome.translation, "FULL TRANSCRIPT[fr]");
        assert_eq!(outcome.language, "fr");
        assert!(outcome.full_file);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_range_means_whole_file() {
        let hits = Arc::new(AtomicUsize::new(0));
        let fixture = Fixture::new(spawn_translate_stub(hits).await);

        let outcome = handle_transcription(form(4.0, "de", Some("  ")), &fixture.deps())
            .await
            .unwrap();

        assert_eq!(fixture.transcriber.calls(), vec![Call::Full]);
        assert_eq!(outcome.range, Range::new(0.0, 4.0));
    }

    #[tokio::test]
    async fn sub_range_uses_windowed_transcription() {
        let hits = Arc::new(AtomicUsize::new(0));
        let fixture = Fixture::new(spawn_translate_stub(hits).await);

        let outcome = handle_transcription(form(10.0, "spanish", Some("2-5")), &fixture.deps())
            .await
            .unwrap();

        assert_eq!(
            fixture.transcriber.calls(),
            vec![Call::Range { offset: 2.0, duration: 3.0 }]
        );
        assert_eq!(outcome.translation, "PARTIAL TRANSCRIPT[es]");
        assert!(!outcome.full_file);
    }

    #[tokio::test]
    async fn malformed_range_stops_before_transcription() {
        let hits = Arc::new(AtomicUsize::new(0));
        let fixture = Fixture::new(spawn_translate_stub(hits.clone()).await);

        let err = handle_transcription(form(10.0, "french", Some("5-2")), &fixture.deps())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedRange { .. }));
        assert!(fixture.transcriber.calls().is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_range_is_rejected_before_conversion() {
        let hits = Arc::new(AtomicUsize::new(0));
        let fixture = Fixture::new(spawn_translate_stub(hits).await);

        // The fixture's converter binary does not exist, so reaching it would
        // surface as a conversion failure instead.
        let err = handle_transcription(
            TranscriptionForm {
                file: Some(UploadedFile {
                    file_name: "memo.mp3".to_string(),
                    bytes: b"ID3 not really mp3".to_vec(),
                }),
                language: Some("french".to_string()),
                range: Some("5-2".to_string()),
            },
            &fixture.deps(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::MalformedRange { .. }));
        assert!(fixture.transcriber.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_language_is_rejected() {
        let fixture = Fixture::new("http://127.0.0.1:9/translate_a/single".to_string());

        let err = handle_transcription(form(1.0, "klingon", None), &fixture.deps())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedLanguage(_)));
        assert!(fixture.transcriber.calls().is_empty());
    }

    #[tokio::test]
    async fn translation_outage_is_a_transcription_failure() {
        let fixture = Fixture::new("http://127.0.0.1:9/translate_a/single".to_string());

        let err = handle_transcription(form(1.0, "italian", None), &fixture.deps())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TranscriptionFailure(_)));
        assert_eq!(fixture.transcriber.calls().len(), 1);
    }

    #[tokio::test]
    async fn probe_reports_duration_and_default_range() {
        let fixture = Fixture::new("http://127.0.0.1:9/translate_a/single".to_string());

        let probe = handle_probe(
            Some(UploadedFile {
                file_name: "memo.wav".to_string(),
                bytes: wav_fixture(16000, 1, 7.5),
            }),
            &fixture.deps(),
        )
        .await
        .unwrap();

        assert_eq!(probe.duration, 7.5);
        assert_eq!(probe.default_range, "0-7.5");

        let err = handle_probe(None, &fixture.deps()).await.unwrap_err();
        assert!(matches!(err, AppError::NoFileProvided));
    }
}
