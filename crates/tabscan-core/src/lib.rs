//! tabscan-core - Tablet image extraction relay library.
//!
//! Accepts a tablet photo, forwards it to a multimodal generative model with
//! a fixed extraction prompt, and passes the model's free-text answer back
//! unparsed. The one piece of real control flow is the bounded
//! exponential-backoff retry around the unreliable remote call.
//!
//! # Architecture
//!
//! ```text
//! Upload → UploadStore → Analyzer → retry(InferenceProvider::generate) → text
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tabscan_core::{Analyzer, Config, GeminiProvider};
//!
//! #[tokio::main]
//! async fn main() -> tabscan_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider = Arc::new(GeminiProvider::from_config(&config.gemini)?);
//!     let analyzer = Analyzer::new(provider, config.retry.policy());
//!
//!     let bytes = tokio::fs::read("tablet1.jpg").await?;
//!     let result = analyzer.analyze_bytes(&bytes, "image/jpeg").await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analyzer;
pub mod config;
pub mod error;
pub mod inference;
pub mod prompt;
pub mod retry;
pub mod upload;

// Re-exports for convenient access
pub use analyzer::Analyzer;
pub use config::Config;
pub use error::{ConfigError, InferenceError, Result, TabscanError, UploadError};
pub use inference::{
    GeminiProvider, ImagePayload, InferenceProvider, InferenceRequest, InferenceResult,
};
pub use retry::{backoff_delay, call_with_retry, RetryPolicy};
pub use upload::{mime_for_filename, UploadStore, UploadedImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
