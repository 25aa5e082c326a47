//! Pluggable narrative backend abstraction
//!
//! This module provides a backend-agnostic interface for text generation.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//! - `generate_text`: the single call site used by the analysis, chat and
//!   glossary flows. It never retries.
//!
//! # Usage
//!
//! ```rust,ignore
//! // Resolved once at startup; `None` means AI features are disabled
//! let ai = AIClient::from_env(Duration::from_secs(60));
//!
//! match generate_text(ai.as_ref(), &prompt, &options).await {
//!     Ok(text) => parse(text),
//!     Err(e) => fallback(),
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

mod gemini;
mod mock;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MOCK_BUDGET_NARRATIVE};
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// Trait defining the interface for all narrative backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate text for a prompt
    ///
    /// Any failure (transport, HTTP status, quota, malformed body) is reported
    /// as an error; the caller decides whether to fall back.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Whether `GenerationOptions::response_schema` is honoured
    fn supports_structured_output(&self) -> bool;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Backend identifier (for logging)
    fn name(&self) -> &'static str;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;

    fn info(&self) -> BackendInfo {
        BackendInfo {
            backend: self.name(),
            model: self.model().to_string(),
            host: self.host().to_string(),
        }
    }
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY, GEMINI_MODEL and GEMINI_HOST
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env(request_timeout: Duration) -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env(request_timeout).map(AIClient::Gemini),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env(request_timeout).map(AIClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(prompt, options).await,
            AIClient::Mock(b) => b.generate(prompt, options).await,
        }
    }

    fn supports_structured_output(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.supports_structured_output(),
            AIClient::Mock(b) => b.supports_structured_output(),
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AIClient::Gemini(b) => b.name(),
            AIClient::Mock(b) => b.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Run one generation attempt
///
/// Fails with `ServiceUnavailable` when no backend is configured and with
/// `Generation` for every other failure, including an empty reply.
pub async fn generate_text<B>(
    ai: Option<&B>,
    prompt: &str,
    options: &GenerationOptions,
) -> Result<String>
where
    B: AIBackend + ?Sized,
{
    let backend = ai.ok_or_else(|| {
        Error::ServiceUnavailable("no narrative backend configured".to_string())
    })?;

    let mut options = options.clone();
    if !backend.supports_structured_output() {
        options.response_schema = None;
    }

    let text = backend
        .generate(prompt, &options)
        .await
        .map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })?;

    if text.trim().is_empty() {
        return Err(Error::Generation(format!(
            "{} returned an empty reply",
            backend.name()
        )));
    }

    debug!(backend = backend.name(), chars = text.len(), "Narrative generated");
    Ok(text)
}
