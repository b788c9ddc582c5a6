//! Request pipeline: uploaded image -> prompt + payload -> resilient model call.

use crate::error::{InferenceError, Result};
use crate::inference::{ImagePayload, InferenceProvider, InferenceRequest, InferenceResult};
use crate::retry::{call_with_retry, RetryPolicy};
use crate::upload::UploadedImage;
use std::sync::Arc;

/// Runs the extraction for one image through the retry wrapper.
///
/// One analyzer is shared across requests; it holds no per-request state, so
/// concurrent requests only share the provider handle.
pub struct Analyzer {
    provider: Arc<dyn InferenceProvider>,
    policy: RetryPolicy,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn InferenceProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Analyze a stored upload.
    pub async fn analyze(&self, image: &UploadedImage) -> Result<InferenceResult> {
        let bytes = tokio::fs::read(image.path()).await?;
        self.analyze_bytes(&bytes, image.mime_type()).await
    }

    /// Analyze raw image bytes.
    ///
    /// Each attempt runs under the provider's per-request deadline; a missed
    /// deadline counts as a transient failure and is retried like any other.
    pub async fn analyze_bytes(&self, bytes: &[u8], mime_type: &str) -> Result<InferenceResult> {
        let request = InferenceRequest::tablet_extraction(ImagePayload::from_bytes(bytes, mime_type));
        let provider = self.provider.as_ref();
        let timeout = provider.timeout();

        let request_ref = &request;
        let result = call_with_retry(&self.policy, move || async move {
            match tokio::time::timeout(timeout, provider.generate(request_ref)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(InferenceError::Timeout {
                    elapsed_ms: timeout.as_millis() as u64,
                }),
            }
        })
        .await?;

        tracing::info!(
            "Extraction complete via {} in {}ms ({} chars)",
            provider.name(),
            result.latency_ms,
            result.text.len()
        );
        Ok(result)
    }
}
