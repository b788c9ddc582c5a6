//! Error types for the tabscan relay.
//!
//! Inference errors carry a transient/permanent classification so the retry
//! layer can decide whether a failure is worth retrying without string
//! matching on messages.

use thiserror::Error;

/// Top-level error type for tabscan operations.
#[derive(Error, Debug)]
pub enum TabscanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Model call errors
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// Upload handling errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures from the external model call, tagged by cause.
///
/// Transient variants are retried by the resilient caller; permanent ones
/// are propagated after the first attempt.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The model service returned HTTP 429
    #[error("Rate limited by model service: {message}")]
    RateLimited { message: String },

    /// Non-2xx HTTP status from the model service
    #[error("Model service HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, DNS, TLS, body read)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Per-attempt deadline exceeded
    #[error("Inference timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Credential rejected (401/403) or missing
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The request or response was malformed (bad payload, empty model output)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl InferenceError {
    /// Whether retrying this failure could plausibly succeed.
    ///
    /// Retryable: rate limits (429), server errors (5xx), timeouts, and
    /// transport failures. Non-retryable: auth failures and bad requests.
    pub fn is_transient(&self) -> bool {
        match self {
            InferenceError::RateLimited { .. } => true,
            InferenceError::Api { status, .. } => (500..=599).contains(status),
            InferenceError::Network { .. } => true,
            InferenceError::Timeout { .. } => true,
            InferenceError::Auth { .. } => false,
            InferenceError::InvalidRequest { .. } => false,
        }
    }
}

/// Upload handling errors.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The multipart request carried no `image` field
    #[error("No image file field in request")]
    MissingField,

    /// The uploaded file had no bytes
    #[error("Uploaded file is empty")]
    EmptyFile,

    /// Writing the upload to disk failed
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for tabscan results.
pub type Result<T> = std::result::Result<T, TabscanError>;
