//! `GeminiGateway` — Google Generative Language REST implementation.
//!
//! Calls the `v1beta` REST surface directly with `reqwest`:
//!
//! * `models/{model}:generateContent` — one-shot, structured output, TTS,
//!   and audio transcription.
//! * `models/{model}:streamGenerateContent?alt=sse` — streamed completion,
//!   consumed line-by-line as server-sent events.
//!
//! All connection details (`base_url`, key, model names, voice) come
//! exclusively from [`AiConfig`]; nothing is hardcoded.  One-shot calls
//! carry the configured per-request timeout; streaming reads are bounded
//! by the transport, not by a client-side clock.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tokio::sync::mpsc;

use crate::config::AiConfig;
use crate::i18n::Language;

use super::gateway::{AiError, AiGateway};
use super::stream::{TextStream, FRAGMENT_CHANNEL_CAPACITY};

// ---------------------------------------------------------------------------
// GeminiGateway
// ---------------------------------------------------------------------------

/// Production gateway over the Generative Language REST API.
pub struct GeminiGateway {
    client: reqwest::Client,
    config: AiConfig,
    api_key: String,
}

impl GeminiGateway {
    /// Build a gateway from application config and a resolved API key.
    pub fn new(config: &AiConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
            api_key,
        }
    }

    fn model_url(&self, model: &str, verb: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.config.base_url, model, verb)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// POST `body` to `model:generateContent` and return the parsed JSON.
    async fn generate(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, AiError> {
        let response = self
            .client
            .post(self.model_url(model, "generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.request_timeout())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))
    }

    fn text_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.config.temperature }
        })
    }
}

// ---------------------------------------------------------------------------
// Response extraction
// ---------------------------------------------------------------------------

/// Concatenate the text parts of the first candidate.
///
/// Chunks that carry only metadata (finish reason, usage) have no text
/// parts and surface as [`AiError::EmptyResponse`].
fn extract_text(json: &serde_json::Value) -> Result<String, AiError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(AiError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

/// Pull the base64 audio payload out of a TTS response.
fn extract_audio(json: &serde_json::Value) -> Result<Vec<u8>, AiError> {
    let data = json["candidates"][0]["content"]["parts"][0]["inlineData"]["data"]
        .as_str()
        .ok_or(AiError::EmptyResponse)?;

    BASE64
        .decode(data)
        .map_err(|e| AiError::Parse(format!("bad audio payload: {e}")))
}

/// Strip markdown decoration before sending text to the TTS voice, which
/// otherwise reads the symbols aloud.
pub fn clean_speech_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .map(|c| match c {
            '*' | '#' | '`' | '_' | '-' => ' ',
            other => other,
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// SSE framing
// ---------------------------------------------------------------------------

/// Incremental server-sent-event line buffer.
///
/// Network chunks split anywhere — mid-line and even mid-UTF-8-character
/// (Devanagari output makes that common).  Bytes are buffered raw and only
/// decoded once a full line has arrived, so multi-byte characters are
/// never torn apart.
struct SseBuffer {
    buf: Vec<u8>,
}

impl SseBuffer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let decoded = String::from_utf8_lossy(&raw);
            let line = decoded.trim_end_matches(|c| c == '\n' || c == '\r');

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    payloads.push(data.to_string());
                }
            }
        }
        payloads
    }
}

/// Read the SSE body and forward text fragments until exhaustion, error,
/// or the consumer dropping its receiver.
async fn pump_sse(
    mut response: reqwest::Response,
    tx: mpsc::Sender<Result<String, AiError>>,
) {
    let mut buffer = SseBuffer::new();

    loop {
        match response.chunk().await {
            Ok(Some(bytes)) => {
                for payload in buffer.push(&bytes) {
                    let event: serde_json::Value = match serde_json::from_str(&payload) {
                        Ok(event) => event,
                        Err(e) => {
                            let _ = tx.send(Err(AiError::Parse(e.to_string()))).await;
                            return;
                        }
                    };
                    // Metadata-only chunks carry no text; skip them.
                    if let Ok(text) = extract_text(&event) {
                        if tx.send(Ok(text)).await.is_err() {
                            return; // consumer closed the stream early
                        }
                    }
                }
            }
            Ok(None) => return, // clean exhaustion: dropping tx ends the stream
            Err(e) => {
                let _ = tx.send(Err(e.into())).await;
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AiGateway implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let json = self
            .generate(&self.config.model, self.text_body(prompt))
            .await?;
        extract_text(&json)
    }

    async fn complete_streaming(&self, prompt: &str) -> Result<TextStream, AiError> {
        let url = format!(
            "{}?alt=sse",
            self.model_url(&self.config.model, "streamGenerateContent")
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.text_body(prompt))
            .send()
            .await?
            .error_for_status()?;

        let (tx, rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);
        let task = tokio::spawn(pump_sse(response, tx));
        Ok(TextStream::new(rx, Some(task)))
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, AiError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        let json = self.generate(&self.config.model, body).await?;
        let text = extract_text(&json)?;
        serde_json::from_str(&text).map_err(|e| AiError::Parse(e.to_string()))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, AiError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": clean_speech_text(text) }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.tts_voice }
                    }
                }
            }
        });

        let json = self.generate(&self.config.tts_model, body).await?;
        extract_audio(&json)
    }

    async fn transcribe(&self, wav: &[u8], language: Language) -> Result<String, AiError> {
        let instruction = format!(
            "Transcribe this voice recording. The speaker is using {}. \
             Respond with only the transcript text, nothing else.",
            match language {
                Language::English => "English",
                Language::Hindi => "Hindi",
            }
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": instruction },
                    { "inlineData": { "mimeType": "audio/wav", "data": BASE64.encode(wav) } }
                ]
            }]
        });

        let json = self.generate(&self.config.model, body).await?;
        extract_text(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
