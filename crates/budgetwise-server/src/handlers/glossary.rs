//! Glossary handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{loose_body, str_field};
use crate::{AppError, AppState};
use budgetwise_core::{explain_term, ExplainRequest, Explanation, GlossaryTerm, Task};

/// Query parameters for listing terms
#[derive(Debug, Deserialize)]
pub struct GlossaryQuery {
    /// Exact category (basics, investing, economics)
    pub category: Option<String>,
    /// Case-insensitive text in the term or definition
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GlossaryListResponse {
    pub terms: Vec<GlossaryTerm>,
    pub count: usize,
}

/// GET /api/glossary - List terms, optionally filtered
pub async fn list_terms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GlossaryQuery>,
) -> Json<GlossaryListResponse> {
    let terms: Vec<GlossaryTerm> = state
        .glossary
        .list(params.category.as_deref(), params.search.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Json(GlossaryListResponse {
        count: terms.len(),
        terms,
    })
}

/// GET /api/glossary/:id - Get one term
pub async fn get_term(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<GlossaryTerm>, AppError> {
    let not_found = || AppError::not_found(&format!("Term with ID {} not found", raw_id));
    let id: i64 = raw_id.parse().map_err(|_| not_found())?;
    state
        .glossary
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

/// Pick term, complexity and custom prompt out of a loose JSON body
pub fn explain_request_from_json(body: &Value) -> ExplainRequest {
    ExplainRequest {
        term: str_field(body, "term"),
        complexity: str_field(body, "complexity"),
        custom_prompt: str_field(body, "custom_prompt"),
    }
}

/// POST /api/glossary/explain - Explain a term at a reading level
pub async fn explain(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Explanation>, AppError> {
    let request = explain_request_from_json(&loose_body(payload, "explain"));

    let explanation = explain_term(
        state.ai.as_ref(),
        &state.glossary,
        &request,
        &state.generation.task(Task::Explain),
    )
    .await?;

    Ok(Json(explanation))
}
