//! Google Gemini provider using the generateContent API.
//!
//! Sends the prompt and a base64 inlineData image part in a single user
//! content entry.

use super::provider::{InferenceProvider, InferenceRequest, InferenceResult};
use crate::config::GeminiConfig;
use crate::error::InferenceError;
use crate::inference::provider::resolve_env_var;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini provider using the generateContent API.
#[derive(Debug)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Build a provider from the config section, resolving the API key
    /// through `${ENV_VAR}` indirection.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, InferenceError> {
        let api_key = resolve_env_var(&config.api_key).ok_or_else(|| InferenceError::Auth {
            message: "Gemini API key not set. Set GEMINI_API_KEY env var.".to_string(),
        })?;
        let mut provider = Self::new(&api_key, &config.model);
        provider.timeout = Duration::from_millis(config.timeout_ms);
        Ok(provider)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
enum Part {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "inlineData")]
    InlineData(InlineData),
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "modelVersion")]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Map a non-success HTTP status from the Gemini API to an error variant.
fn error_for_status(status: u16, body: String) -> InferenceError {
    match status {
        429 => InferenceError::RateLimited { message: body },
        401 | 403 => InferenceError::Auth { message: body },
        _ => InferenceError::Api {
            status,
            message: body,
        },
    }
}

/// Join the text parts of the first candidate, rejecting empty output.
fn extract_text(response: &GenerateContentResponse) -> Result<String, InferenceError> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(InferenceError::InvalidRequest {
            message: "Gemini returned no text content".to_string(),
        });
    }
    Ok(text)
}

#[async_trait]
impl InferenceProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &InferenceRequest) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(request.prompt.clone()),
                    Part::InlineData(InlineData {
                        mime_type: request.image.mime_type.clone(),
                        data: request.image.data.clone(),
                    }),
                ],
            }],
        };

        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Network {
                message: format!("Gemini request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), text));
        }

        let generate_resp: GenerateContentResponse =
            resp.json().await.map_err(|e| InferenceError::Network {
                message: format!("Failed to parse Gemini response: {e}"),
            })?;

        let text = extract_text(&generate_resp)?;

        Ok(InferenceResult {
            text,
            model: generate_resp
                .model_version
                .unwrap_or_else(|| self.model.clone()),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::provider::ImagePayload;

    #[test]
    fn test_request_body_wire_shape() {
        let request = InferenceRequest::tablet_extraction(ImagePayload::from_bytes(
            &[1, 2, 3],
            "image/jpeg",
        ));
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(request.prompt.clone()),
                    Part::InlineData(InlineData {
                        mime_type: request.image.mime_type.clone(),
                        data: request.image.data.clone(),
                    }),
                ],
            }],
        };

        let value = serde_json::to_value(&body).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("**Tablet Name:**"));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"text": "**Tablet Name:** Paracetamol"},
                            {"text": "\n**Purpose:** Pain relief"}
                        ]
                    }
                }],
                "modelVersion": "gemini-1.5-pro"
            }"#,
        )
        .unwrap();

        let text = extract_text(&response).unwrap();
        assert!(text.starts_with("**Tablet Name:** Paracetamol"));
        assert!(text.contains("**Purpose:** Pain relief"));
    }

    #[test]
    fn test_extract_text_rejects_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        let err = extract_text(&response).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidRequest { .. }));
    }

    #[test]
    fn test_error_for_status_classification() {
        assert!(matches!(
            error_for_status(429, String::new()),
            InferenceError::RateLimited { .. }
        ));
        assert!(matches!(
            error_for_status(401, String::new()),
            InferenceError::Auth { .. }
        ));
        assert!(matches!(
            error_for_status(500, String::new()),
            InferenceError::Api { status: 500, .. }
        ));
        // 5xx maps to a transient API error, 400 to a permanent one
        assert!(error_for_status(503, String::new()).is_transient());
        assert!(!error_for_status(400, String::new()).is_transient());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = GeminiConfig {
            api_key: "${TABSCAN_TEST_UNSET_KEY}".to_string(),
            ..GeminiConfig::default()
        };
        let err = GeminiProvider::from_config(&config).unwrap_err();
        assert!(matches!(err, InferenceError::Auth { .. }));
    }
}
