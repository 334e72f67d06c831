//! Fixtures and fake collaborators shared by unit tests.

use async_trait::async_trait;
use axum::{extract::Query, routing::get, Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::asr::Transcriber;
use crate::audio::AudioAsset;

/// Silent 16-bit PCM WAV of the given length
pub fn wav_fixture(sample_rate: u32, channels: u16, secs: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (sample_rate as f64 * secs).round() as usize;
        for _ in 0..frames * channels as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Full,
    Range { offset: f64, duration: f64 },
}

/// Records every call and answers with a canned transcript
#[derive(Default)]
pub struct RecordingTranscriber {
    pub calls: Mutex<Vec<Call>>,
    pub fail_with: Option<String>,
}

impl RecordingTranscriber {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, text: &str) -> Result<String, anyhow::Error> {
        match &self.fail_with {
            Some(msg) => Err(anyhow::anyhow!(msg.clone())),
            None => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for RecordingTranscriber {
    async fn transcribe(&self, _audio: &AudioAsset) -> Result<String, anyhow::Error> {
        self.calls.lock().unwrap().push(Call::Full);
        self.answer("full transcript")
    }

    async fn transcribe_range(
        &self,
        _audio: &AudioAsset,
        offset: f64,
        duration: f64,
    ) -> Result<String, anyhow::Error> {
        self.calls.lock().unwrap().push(Call::Range { offset, duration });
        self.answer("partial transcript")
    }
}

/// Translation endpoint stand-in: uppercases `q` and tags it with `tl`, split
/// across two segments like the real endpoint. Returns the endpoint URL.
pub async fn spawn_translate_stub(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new().route(
        "/translate_a/single",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let q = params.get("q").cloned().unwrap_or_default().to_uppercase();
                let tl = params.get("tl").cloned().unwrap_or_default();
                let mid = q.char_indices().nth(q.chars().count() / 2).map_or(q.len(), |(i, _)| i);
                let (head, tail) = q.split_at(mid);
                Json(json!([
                    [[head, "", null], [format!("{}[{}]", tail, tl), "", null]],
                    null,
                    "en"
                ]))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/translate_a/single", addr)
}

/// Hand-built multipart/form-data body for router tests
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "recording-translator-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}
