//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Budget analysis
//! - `glossary` - Glossary browsing and term explanations
//! - `serve` - Web server command
//! - `status` - Configuration and backend status

pub mod analyze;
pub mod glossary;
pub mod serve;
pub mod status;

pub use analyze::*;
pub use glossary::*;
pub use serve::*;
pub use status::*;

use std::path::Path;

use anyhow::{Context, Result};
use budgetwise_core::{AIBackend, AIClient, GenerationConfig};
use tracing::info;

/// Load generation settings from `--config`, else `BUDGETWISE_CONFIG`, else defaults
pub fn load_generation_config(path: Option<&Path>) -> Result<GenerationConfig> {
    match path {
        Some(path) => GenerationConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => GenerationConfig::from_env().context("Failed to load generation config"),
    }
}

/// Narrative backend from the environment, if configured
pub fn ai_from_env(generation: &GenerationConfig) -> Option<AIClient> {
    let ai = AIClient::from_env(generation.request_timeout);
    if let Some(ref client) = ai {
        info!("Using {} ({})", client.name(), client.model());
    }
    ai
}
