//! Budget analysis prompt
//!
//! All arithmetic is done here and handed to the narrative service as a
//! calculated summary, so the reply never has to recompute totals.

use crate::models::BudgetInput;

use super::metrics::{display_category, money, BudgetMetrics};

/// Section headers the narrative service is asked to produce
pub const FINANCIAL_ADVICE: &str = "FINANCIAL ADVICE";
pub const SAVING_TIPS: &str = "SAVING TIPS";
pub const SAVING_PLAN: &str = "SAVING PLAN";
pub const WHERE_SAVINGS_COULD_GO: &str = "WHERE SAVINGS COULD GO";

/// Top expense categories with their share of income ("N/A" when income is 0)
fn top_categories(budget: &BudgetInput) -> String {
    if budget.monthly_income() <= 0.0 {
        return "N/A".to_string();
    }
    let top: Vec<String> = budget
        .expenses_by_amount()
        .into_iter()
        .take(3)
        .map(|(category, amount)| {
            format!(
                "{} ({}, {:.1}%)",
                display_category(category),
                money(amount),
                budget.percent_of_income(amount)
            )
        })
        .collect();
    if top.is_empty() {
        "N/A".to_string()
    } else {
        top.join(", ")
    }
}

fn calculated_summary(budget: &BudgetInput, m: &BudgetMetrics) -> String {
    let situation = if m.is_overspending() {
        "⚠️ Overspending"
    } else {
        "✅ Within budget"
    };
    let savings_status = if m.is_high_saver() {
        "✅ Excellent"
    } else if m.is_low_saver() {
        "⚠️ Needs improvement"
    } else {
        "🟡 Good"
    };

    format!(
        "CALCULATED SUMMARY (use these exact numbers; do not recalculate):
- Monthly income: {income}
- Total expenses: {total}
- Remaining after expenses: {remaining}
- Current savings: {savings} ({savings_pct:.1}% of income)
- Housing cost: {housing} ({housing_pct:.1}% of income)
- Top 3 expenses: {top}
- Financial situation: {situation}
- Savings status: {savings_status}",
        income = money(m.income),
        total = money(m.total_expenses),
        remaining = money(m.remaining),
        savings = money(m.savings),
        savings_pct = m.savings_pct,
        housing = money(m.housing),
        housing_pct = m.housing_pct,
        top = top_categories(budget),
    )
}

/// Situation-specific instructions
fn situation_notes(m: &BudgetMetrics) -> String {
    let mut notes = String::new();
    if m.is_overspending() {
        notes.push_str("\n⚠️ IMPORTANT: Expenses exceed income. Focus advice on reducing spending or increasing income. Do NOT suggest investing until budget is balanced.");
    }
    if m.is_zero_income() {
        notes.push_str(
            "\n⚠️ IMPORTANT: Income is zero. Explain that a budget plan requires income data.",
        );
    }
    if m.is_low_income() {
        notes.push_str("\n⚠️ IMPORTANT: Income is relatively low. Be realistic and encouraging; acknowledge some recommendations may be challenging.");
    }
    if m.is_high_saver() {
        notes.push_str("\n✅ IMPORTANT: User is already saving 20%+. Praise this and focus on fine-tuning or next steps.");
    }
    notes
}

/// Build the narrative prompt for a budget
pub fn build_budget_prompt(budget: &BudgetInput) -> String {
    let metrics = BudgetMetrics::from_budget(budget);
    let goal = budget.goal().description();

    let expenses: String = budget
        .expenses()
        .iter()
        .map(|(category, amount)| format!("- {}: {}\n", display_category(category), money(*amount)))
        .collect();

    format!(
        "You are a financial educator helping a young adult understand their budget. Use ONLY the calculated numbers I provide below. Do NOT recalculate percentages or totals.

{summary}

USER'S GOAL: {goal}

DETAILED EXPENSES:
{expenses}
{notes}

Respond with exactly FOUR sections using these exact headers:

## {advice}
[One short paragraph (3-4 sentences) of personalized financial advice. Use the exact numbers from the calculated summary above. Mention their biggest lever (e.g. housing, top expense) or what they're doing well. Tailor to their goal: {goal}. Be encouraging and realistic.]

## {tips}
[3 to 5 bullet points with specific, actionable saving tips. Base tips on their exact numbers. If overspending, focus on cutting expenses. If they have remaining money, suggest how to allocate it. Mention emergency fund if relevant. Tailor to goal: {goal}. No specific products.]

## {plan} (3-6 MONTHS)
[Create a realistic timeline with 2 phases:
- \"Months 1-3\": 2-3 specific actions with target savings percentage
- \"Months 4-6\": 2-3 next steps to build on progress
Use their current savings rate ({savings_pct:.1}%) as starting point. Make small, achievable steps. Tailor to goal: {goal}.]

## {where_to}
[One short paragraph only. Explain in general terms where people often put savings after building an emergency fund: e.g. high-yield savings accounts, retirement accounts like 401(k) or IRA, broad market index funds. Do NOT recommend specific funds or products. End with: \"Talk to a licensed financial advisor for your situation.\"]

End with: \"Disclaimer: This is for education only and is not financial advice.\"
",
        summary = calculated_summary(budget, &metrics),
        goal = goal,
        expenses = expenses,
        notes = situation_notes(&metrics),
        advice = FINANCIAL_ADVICE,
        tips = SAVING_TIPS,
        plan = SAVING_PLAN,
        where_to = WHERE_SAVINGS_COULD_GO,
        savings_pct = metrics.savings_pct,
    )
}
