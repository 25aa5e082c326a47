//! Budget analysis command

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use budgetwise_core::{
    analyze_budget, AnalysisResult, BudgetInput, GenerationConfig, Goal, NarrativeSource, Task,
};

use super::ai_from_env;

/// Parse `category=amount`
pub fn parse_expense(input: &str) -> Result<(String, f64)> {
    let Some((category, amount)) = input.split_once('=') else {
        bail!("Expected category=amount, got '{}'", input);
    };
    let category = category.trim();
    if category.is_empty() {
        bail!("Missing category name in '{}'", input);
    }
    let amount: f64 = amount
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount in '{}'", input))?;
    Ok((category.to_string(), amount))
}

/// Build a budget from a JSON file or from flags
pub fn build_budget(
    file: Option<&Path>,
    income: Option<f64>,
    expenses: &[String],
    goal: Option<&str>,
) -> Result<BudgetInput> {
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let budget: BudgetInput = serde_json::from_str(&content)
            .with_context(|| format!("Invalid budget in {}", path.display()))?;
        return Ok(budget);
    }

    let Some(income) = income else {
        bail!("Provide --file or --income");
    };

    let mut map = BTreeMap::new();
    for entry in expenses {
        let (category, amount) = parse_expense(entry)?;
        *map.entry(category).or_insert(0.0) += amount;
    }

    let goal: Goal = match goal {
        Some(g) => g.parse()?,
        None => Goal::default(),
    };

    Ok(BudgetInput::new(income, map, goal)?)
}

/// Human-readable analysis report
pub struct AnalysisReport<'a> {
    pub result: &'a AnalysisResult,
    pub source: NarrativeSource,
}

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f)?;
        writeln!(f, "📊 Budget Analysis ({})", result.goal.description())?;
        writeln!(f, "   ─────────────────────────────────────────────────────────────")?;

        for row in &result.breakdown {
            writeln!(
                f,
                "   {:<24} ${:>10.2}  {:>5.1}%",
                row.category, row.amount, row.percentage
            )?;
        }

        writeln!(f)?;
        for insight in &result.insights {
            writeln!(f, "   • {}", insight)?;
        }

        writeln!(f)?;
        writeln!(f, "💬 Advice")?;
        writeln!(f, "   {}", result.financial_advice)?;

        if !result.saving_tips.is_empty() {
            writeln!(f)?;
            writeln!(f, "💡 Saving tips")?;
            for tip in &result.saving_tips {
                writeln!(f, "   - {}", tip)?;
            }
        }

        if let Some(plan) = &result.saving_plan {
            writeln!(f)?;
            writeln!(f, "🗓️  Saving plan")?;
            writeln!(f, "   Months 1-3:")?;
            for step in &plan.months_1_3 {
                writeln!(f, "     - {}", step)?;
            }
            writeln!(f, "   Months 4-6:")?;
            for step in &plan.months_4_6 {
                writeln!(f, "     - {}", step)?;
            }
        }

        if !result.where_savings_could_go.is_empty() {
            writeln!(f)?;
            writeln!(f, "🏦 Where savings could go")?;
            writeln!(f, "   {}", result.where_savings_could_go)?;
        }

        if self.source == NarrativeSource::Fallback {
            writeln!(f)?;
            writeln!(f, "   ℹ️  Narrative from built-in rules (no narrative service reply)")?;
        }
        Ok(())
    }
}

pub fn render_analysis(result: &AnalysisResult, source: NarrativeSource) -> String {
    AnalysisReport { result, source }.to_string()
}

pub async fn cmd_analyze(
    file: Option<&Path>,
    income: Option<f64>,
    expenses: &[String],
    goal: Option<&str>,
    json: bool,
    generation: &GenerationConfig,
) -> Result<()> {
    let budget = build_budget(file, income, expenses, goal)?;
    let ai = ai_from_env(generation);

    let outcome = analyze_budget(
        ai.as_ref(),
        &budget,
        &generation.task(Task::BudgetAnalysis),
    )
    .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    } else {
        print!(
            "{}",
            AnalysisReport {
                result: &outcome.result,
                source: outcome.source,
            }
        );
    }
    Ok(())
}
