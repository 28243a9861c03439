//! Core `AiGateway` trait, error type, and the disabled stub.
//!
//! The gateway is the application's single collaborator for generative-AI
//! work: one-shot completion, streamed completion, schema-validated
//! structured completion, speech synthesis and audio transcription.  The
//! production implementation is [`GeminiGateway`](super::GeminiGateway);
//! tests substitute hand-written doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::i18n::Language;

use super::stream::TextStream;

// ---------------------------------------------------------------------------
// AiError
// ---------------------------------------------------------------------------

/// Errors that can occur during gateway operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key is configured; every call fails fast with this variant
    /// and is never retried.
    #[error("AI features are disabled: no API key configured")]
    Disabled,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("gateway request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON, or a
    /// structured completion did not conform to its schema.
    #[error("failed to parse gateway response: {0}")]
    Parse(String),

    /// The model returned a response with no usable content.
    #[error("gateway returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AiGateway trait
// ---------------------------------------------------------------------------

/// Async trait for the external generative-AI endpoint.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (wrapped in `Arc<dyn AiGateway>`).
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Single-shot text completion.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;

    /// Streamed text completion.  The returned [`TextStream`] is finite and
    /// not restartable; dropping it early cancels the transport.
    async fn complete_streaming(&self, prompt: &str) -> Result<TextStream, AiError>;

    /// Completion constrained to a JSON schema.  Fails with
    /// [`AiError::Parse`] when the model output does not parse.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, AiError>;

    /// Synthesize speech for `text`.  Returns raw little-endian 16-bit PCM
    /// at the model's fixed sample rate (24 kHz mono for current voices).
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, AiError>;

    /// Transcribe a WAV-encoded voice recording in the given language.
    async fn transcribe(&self, wav: &[u8], language: Language) -> Result<String, AiError>;
}

// ---------------------------------------------------------------------------
// DisabledGateway
// ---------------------------------------------------------------------------

/// Gateway stub used when no API key can be resolved.
///
/// Every operation fails fast with [`AiError::Disabled`]; the UI converts
/// that into a static localized "AI features disabled" message.
pub struct DisabledGateway;

#[async_trait]
impl AiGateway for DisabledGateway {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }

    async fn complete_streaming(&self, _prompt: &str) -> Result<TextStream, AiError> {
        Err(AiError::Disabled)
    }

    async fn complete_structured(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, AiError> {
        Err(AiError::Disabled)
    }

    async fn synthesize_speech(&self, _text: &str) -> Result<Vec<u8>, AiError> {
        Err(AiError::Disabled)
    }

    async fn transcribe(&self, _wav: &[u8], _language: Language) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_gateway_fails_every_operation() {
        let gateway = DisabledGateway;

        assert!(matches!(
            gateway.complete("q").await,
            Err(AiError::Disabled)
        ));
        assert!(matches!(
            gateway.complete_streaming("q").await,
            Err(AiError::Disabled)
        ));
        assert!(matches!(
            gateway
                .complete_structured("q", &serde_json::json!({}))
                .await,
            Err(AiError::Disabled)
        ));
        assert!(matches!(
            gateway.synthesize_speech("hello").await,
            Err(AiError::Disabled)
        ));
        assert!(matches!(
            gateway.transcribe(&[], Language::English).await,
            Err(AiError::Disabled)
        ));
    }

    /// The trait must remain object-safe (used as `Arc<dyn AiGateway>`).
    #[test]
    fn gateway_is_object_safe() {
        let gateway: Box<dyn AiGateway> = Box::new(DisabledGateway);
        drop(gateway);
    }
}
