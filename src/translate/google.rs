use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::TranslateError;
use crate::config_manager::TranslateConfig;

/// Translate `text` from `source` (a language code or "auto") into `target`.
///
/// Text longer than `max_chunk_chars` is sent in whitespace-separated chunks,
/// in order, and the translated pieces are joined with a single space.
pub async fn translate(
    client: &Client,
    config: &TranslateConfig,
    text: &str,
    source: &str,
    target: &str,
) -> Result<String, TranslateError> {
    if text.trim().is_empty() || source.eq_ignore_ascii_case(target) {
        return Ok(text.to_string());
    }

    let chunks = chunk_text(text, config.max_chunk_chars);
    let mut translated = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        debug!(
            "Translating chunk {}/{} ({} chars) {} -> {}",
            i + 1,
            chunks.len(),
            chunk.chars().count(),
            source,
            target
        );
        translated.push(translate_chunk(client, &config.endpoint, chunk, source, target).await?);
    }

    Ok(translated.join(" "))
}

async fn translate_chunk(
    client: &Client,
    endpoint: &str,
    text: &str,
    source: &str,
    target: &str,
) -> Result<String, TranslateError> {
    let response = client
        .get(endpoint)
        .query(&[
            ("client", "gtx"),
            ("sl", source),
            ("tl", target),
            ("dt", "t"),
            ("q", text),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TranslateError::Status(status.as_u16()));
    }

    let body: Value = response.json().await?;
    parse_response(&body)
}

/// The endpoint answers `[[["translated", "original", ...], ...], ...]`
fn parse_response(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::UnexpectedResponse(truncate(body.to_string())))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    Ok(text)
}

fn truncate(mut s: String) -> String {
    if s.len() > 200 {
        let mut cut = 200;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

/// Split on whitespace into pieces of at most `max_chars` characters.
/// A single word longer than the limit is cut mid-word.
pub(crate) fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() { word.len() } else { word.len() + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
