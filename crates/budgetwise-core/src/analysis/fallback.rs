//! Rule-based narrative used when generation is unavailable or fails

use crate::models::{BudgetInput, SavingPlan};

use super::metrics::{money, BudgetMetrics, HOUSING_NOTE_PCT};
use super::parsing::Narrative;

const CLOSING_ADVICE: &str = "Small steps add up, focus on one category to improve first.";

const WHERE_SAVINGS_COULD_GO: &str = "After an emergency fund, people often learn about \
high-yield savings accounts, retirement accounts (e.g. 401(k), IRA), and broad market index \
funds. Talk to a licensed financial advisor for your situation.";

fn financial_advice(m: &BudgetMetrics) -> String {
    let mut advice = format!(
        "Based on your income of {} and expenses of {}, you have {} left. ",
        money(m.income),
        money(m.total_expenses),
        money(m.remaining)
    );

    if m.is_overspending() {
        advice.push_str(&format!(
            "⚠️ Your expenses exceed income by {}. Focus on reducing spending or increasing income before saving. ",
            money(m.remaining.abs())
        ));
    } else if m.housing_pct > HOUSING_NOTE_PCT {
        advice.push_str(&format!(
            "Housing is {:.1}% of your income (often recommended under 30%). ",
            m.housing_pct
        ));
    }

    if m.savings_pct >= 0.0 && m.savings_pct < 20.0 && m.remaining >= 0.0 {
        advice.push_str(&format!(
            "You're saving {:.1}%; building toward 20% can help long-term. ",
            m.savings_pct
        ));
    }

    if m.is_zero_income() {
        advice.push_str("A budget plan needs income data, so add your monthly income to get a fuller picture. ");
    }

    advice.push_str(CLOSING_ADVICE);
    advice
}

fn saving_tips(m: &BudgetMetrics) -> Vec<String> {
    let mut tips = Vec::new();
    if m.is_overspending() {
        tips.push("Review your top 3 expenses, can any be reduced?".to_string());
    }
    if m.remaining > 0.0 {
        tips.push(format!(
            "Add {} to savings or an emergency fund.",
            money(m.remaining)
        ));
    }
    tips.push("Set up automatic transfers to savings on payday.".to_string());
    tips.push("Aim for 3–6 months of expenses in an emergency fund.".to_string());
    if m.savings_pct < 20.0 {
        tips.push("Try increasing savings by 1–2% of income each month.".to_string());
    }
    tips
}

fn saving_plan(m: &BudgetMetrics) -> SavingPlan {
    SavingPlan {
        months_1_3: vec![
            format!(
                "Increase savings from {:.1}% to {:.1}%",
                m.savings_pct,
                m.savings_pct + 2.0
            ),
            "Set up automatic transfer of $50-100/month to savings".to_string(),
            "Build emergency fund: aim for $500-1000 first".to_string(),
        ],
        months_4_6: vec![
            format!("Grow savings to {:.1}% of income", m.savings_pct + 5.0),
            "Increase emergency fund to 1-2 months of expenses".to_string(),
            "Review and optimize top expense categories".to_string(),
        ],
    }
}

/// Build a complete narrative from the budget alone
pub fn fallback_narrative(budget: &BudgetInput) -> Narrative {
    let metrics = BudgetMetrics::from_budget(budget);
    Narrative {
        financial_advice: financial_advice(&metrics),
        saving_tips: saving_tips(&metrics),
        saving_plan: Some(saving_plan(&metrics)),
        where_savings_could_go: WHERE_SAVINGS_COULD_GO.to_string(),
    }
}
