//! Inference provider trait and request/response types.
//!
//! Defines the interface the relay calls to reach the external multimodal
//! model. The server holds a `Arc<dyn InferenceProvider>` so tests can
//! substitute a fake capability.

use crate::error::InferenceError;
use crate::prompt::TABLET_PROMPT;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to a model API.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

impl ImagePayload {
    /// Create an `ImagePayload` from raw bytes and a MIME type.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }
}

/// A single extraction request: the fixed prompt plus one image.
/// Constructed fresh per call; immutable once built.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Text instructions for the model
    pub prompt: String,
    /// The tablet image to analyze
    pub image: ImagePayload,
}

impl InferenceRequest {
    /// Build the tablet-extraction request for an image.
    pub fn tablet_extraction(image: ImagePayload) -> Self {
        Self {
            prompt: TABLET_PROMPT.to_string(),
            image,
        }
    }
}

/// The model's reply. The text is passed through unparsed.
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Raw free-text output
    pub text: String,
    /// Model identifier that produced the reply
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait the external model capability is accessed through.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn InferenceProvider>` for injection).
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send one prompt + image and return the extracted text.
    async fn generate(&self, request: &InferenceRequest) -> Result<InferenceResult, InferenceError>;

    /// Per-attempt timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_payload_from_bytes() {
        let payload = ImagePayload::from_bytes(&[0xFF, 0xD8, 0xFF], "image/jpeg");
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.data, "/9j/");
    }

    #[test]
    fn test_tablet_extraction_request_uses_fixed_prompt() {
        let payload = ImagePayload::from_bytes(&[1, 2, 3], "image/png");
        let request = InferenceRequest::tablet_extraction(payload);
        assert_eq!(request.prompt, TABLET_PROMPT);
        assert_eq!(request.image.mime_type, "image/png");
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }
}
