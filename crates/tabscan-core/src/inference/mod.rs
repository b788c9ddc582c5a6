//! External model integration.
//!
//! Provides the provider abstraction the relay calls through and the Gemini
//! implementation of it.

pub(crate) mod gemini;
pub(crate) mod provider;

pub use gemini::GeminiProvider;
pub use provider::{
    resolve_env_var, ImagePayload, InferenceProvider, InferenceRequest, InferenceResult,
};
