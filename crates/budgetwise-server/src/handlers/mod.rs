//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analyze;
pub mod chat;
pub mod glossary;
pub mod health;

// Re-export all handlers for use in router
pub use analyze::*;
pub use chat::*;
pub use glossary::*;
pub use health::*;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;
use tracing::debug;

/// Accept any JSON body; an unreadable one reads as `null`
///
/// Chat and explain pick fields out one by one, so a wrongly typed optional
/// field is dropped instead of failing the whole request.
pub(crate) fn loose_body(payload: Result<Json<Value>, JsonRejection>, route: &str) -> Value {
    payload.map(|Json(v)| v).unwrap_or_else(|e| {
        debug!("Unreadable {} body: {}", route, e);
        Value::Null
    })
}

/// String field, or `None` when missing or not a string
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Numeric field; numeric strings such as `"3000"` are accepted
pub(crate) fn number_field(value: &Value, key: &str) -> Option<f64> {
    let number = match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
