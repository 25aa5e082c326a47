//! Merge a narrative with locally computed breakdown and insights

use crate::models::{AnalysisResult, BreakdownItem, BudgetInput};

use super::metrics::{display_category, money, round1, BudgetMetrics};
use super::parsing::Narrative;

/// Every expense, largest first, with its share of income
pub fn compute_breakdown(budget: &BudgetInput) -> Vec<BreakdownItem> {
    budget
        .expenses_by_amount()
        .into_iter()
        .map(|(category, amount)| BreakdownItem {
            category: display_category(category),
            amount,
            percentage: round1(budget.percent_of_income(amount)),
        })
        .collect()
}

/// Short computed observations about the budget
pub fn compute_insights(budget: &BudgetInput) -> Vec<String> {
    let m = BudgetMetrics::from_budget(budget);
    let mut insights = Vec::new();

    if m.income > 0.0 {
        insights.push(format!(
            "Total expenses: {} ({:.1}% of income)",
            money(m.total_expenses),
            budget.percent_of_income(m.total_expenses)
        ));
    }

    if m.remaining > 0.0 {
        insights.push(format!(
            "Remaining: {}, consider adding to savings",
            money(m.remaining)
        ));
    } else if m.remaining < 0.0 {
        insights.push(format!(
            "⚠️ Expenses exceed income by {}",
            money(m.remaining.abs())
        ));
    }

    if m.is_high_saver() {
        insights.push("✅ Excellent savings rate (20%+)".to_string());
    } else if m.is_low_saver() {
        insights.push("💡 Aim to increase savings to 10-20%".to_string());
    } else {
        insights.push("50/30/20 guideline: 50% needs, 30% wants, 20% savings".to_string());
    }

    insights
}

/// Build the final result; the same for generated and fallback narratives
pub fn assemble(budget: &BudgetInput, narrative: Narrative) -> AnalysisResult {
    AnalysisResult {
        financial_advice: narrative.financial_advice,
        saving_tips: narrative.saving_tips,
        saving_plan: narrative.saving_plan,
        where_savings_could_go: narrative.where_savings_could_go,
        breakdown: compute_breakdown(budget),
        insights: compute_insights(budget),
        goal: budget.goal(),
    }
}
