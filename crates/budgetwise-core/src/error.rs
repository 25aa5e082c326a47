//! Error types for Budgetwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing or a value is out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No narrative service is configured
    #[error("Narrative service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The narrative service call failed at runtime
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
