//! Budgeting chat handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::{loose_body, number_field, str_field};
use crate::{AppError, AppState};
use budgetwise_core::{chat_reply, ChatContext, Task};

#[derive(Debug, Default, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub context: ChatContext,
}

impl ChatRequest {
    /// Pick the message and context out of a loose JSON body
    pub fn from_json(body: &Value) -> Self {
        let context = body
            .get("context")
            .map(|ctx| ChatContext {
                monthly_income: number_field(ctx, "monthly_income"),
                goal: str_field(ctx, "goal"),
            })
            .unwrap_or_default();

        Self {
            message: str_field(body, "message").unwrap_or_default(),
            context,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat - Answer a short budgeting question
///
/// An unreadable body is treated as an empty request, so availability is
/// still reported before validation.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = ChatRequest::from_json(&loose_body(payload, "chat"));

    let reply = chat_reply(
        state.ai.as_ref(),
        &request.message,
        &request.context,
        &state.generation.task(Task::Chat),
    )
    .await?;

    Ok(Json(ChatResponse { reply }))
}
