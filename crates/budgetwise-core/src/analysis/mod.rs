//! Budget analysis pipeline
//!
//! ```text
//! budget → prompt → generate ─ok──→ parse ────┐
//!                       └─fail─→ fallback ─┴─→ assemble
//! ```
//!
//! Arithmetic is always local. The narrative service only supplies prose, and
//! when it is missing or fails the rule-based fallback produces the same shape.

mod assembler;
mod fallback;
mod metrics;
mod parsing;
mod prompt;

pub use assembler::{assemble, compute_breakdown, compute_insights};
pub use fallback::fallback_narrative;
pub use metrics::{display_category, BudgetMetrics};
pub use parsing::{narrative_schema, parse_narrative, Narrative};
pub use prompt::build_budget_prompt;

use tracing::{debug, info, warn};

use crate::ai::{generate_text, AIBackend, GenerationOptions};
use crate::config::TaskSettings;
use crate::models::{AnalysisResult, BudgetInput};

/// Where the narrative of a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

impl NarrativeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        }
    }
}

/// A finished analysis plus how its narrative was produced
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub source: NarrativeSource,
}

/// Analysis using only the rule-based narrative
pub fn fallback_analysis(budget: &BudgetInput) -> AnalysisResult {
    assemble(budget, fallback_narrative(budget))
}

/// Analyze a budget, degrading to the fallback narrative on any failure
///
/// Never fails: a missing backend or a failed generation both yield a
/// complete result. One generation attempt is made, with no retries.
pub async fn analyze_budget<B>(
    ai: Option<&B>,
    budget: &BudgetInput,
    settings: &TaskSettings,
) -> AnalysisOutcome
where
    B: AIBackend + ?Sized,
{
    let prompt = build_budget_prompt(budget);
    debug!(chars = prompt.len(), goal = %budget.goal(), "Built budget prompt");

    let mut options = GenerationOptions::from_settings(settings);
    if settings.structured_output {
        options = options.with_schema(narrative_schema());
    }

    match generate_text(ai, &prompt, &options).await {
        Ok(text) => {
            debug!("Narrative reply: {}", text);
            let narrative = parse_narrative(&text);
            info!(
                tips = narrative.saving_tips.len(),
                has_plan = narrative.saving_plan.is_some(),
                "Budget analyzed with generated narrative"
            );
            AnalysisOutcome {
                result: assemble(budget, narrative),
                source: NarrativeSource::Generated,
            }
        }
        Err(e) => {
            warn!("Narrative generation failed, using fallback: {}", e);
            AnalysisOutcome {
                result: fallback_analysis(budget),
                source: NarrativeSource::Fallback,
            }
        }
    }
}
