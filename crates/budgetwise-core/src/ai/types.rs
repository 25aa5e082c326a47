//! AI backend request types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde_json::Value;

use crate::config::TaskSettings;

/// Per-call generation options
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// JSON schema for a structured reply. Backends without structured output
    /// support ignore it and return free text.
    pub response_schema: Option<Value>,
}

impl GenerationOptions {
    /// Options for a task, without a response schema
    pub fn from_settings(settings: &TaskSettings) -> Self {
        Self {
            max_output_tokens: settings.max_output_tokens,
            temperature: settings.temperature,
            response_schema: None,
        }
    }

    /// Attach a response schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::from_settings(&TaskSettings::default())
    }
}

/// Backend description for status output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub backend: &'static str,
    pub model: String,
    pub host: String,
}
