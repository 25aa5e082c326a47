//! Budgetwise Core Library
//!
//! Shared functionality for the Budgetwise budget guidance service:
//! - Budget input validation and derived totals
//! - Budget analysis pipeline with a rule-based fallback
//! - Pluggable narrative backends (Gemini, mock)
//! - Generation settings per task
//! - Budgeting chat assistant
//! - Financial glossary with term explanations

pub mod ai;
pub mod analysis;
pub mod chat;
pub mod config;
pub mod error;
pub mod glossary;
pub mod models;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, BackendInfo, GeminiBackend, GenerationOptions, MockBackend};
pub use analysis::{analyze_budget, fallback_analysis, AnalysisOutcome, NarrativeSource};
pub use chat::{chat_reply, ChatContext};
pub use config::{GenerationConfig, Task, TaskSettings};
pub use error::{Error, Result};
pub use glossary::{explain_term, ExplainRequest, Explanation, Glossary};
pub use models::{
    AnalysisResult, BreakdownItem, BudgetInput, Complexity, Goal, GlossaryTerm, SavingPlan,
};
