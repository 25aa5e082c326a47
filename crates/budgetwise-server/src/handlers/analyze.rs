//! Budget analysis handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::{AppError, AppState};
use budgetwise_core::{analyze_budget, AnalysisResult, BudgetInput, Task};

/// POST /api/analyze - Analyze a monthly budget
///
/// Always answers with a full result; without a narrative service (or when
/// it fails) the narrative comes from the rule-based fallback.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BudgetInput>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(budget) = payload.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let settings = state.generation.task(Task::BudgetAnalysis);
    let outcome = analyze_budget(state.ai.as_ref(), &budget, &settings).await;

    info!(
        goal = %budget.goal(),
        categories = budget.expenses().len(),
        source = outcome.source.as_str(),
        "Budget analyzed"
    );

    Ok(Json(outcome.result))
}
