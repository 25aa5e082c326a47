//! Derived budget figures shared by the prompt, fallback, and assembler

use crate::models::BudgetInput;

/// Expense category treated as savings
pub const SAVINGS_CATEGORY: &str = "savings";

/// Expense category treated as housing
pub const HOUSING_CATEGORY: &str = "rent";

/// Income below this is considered low
pub const LOW_INCOME_THRESHOLD: f64 = 2000.0;

/// Housing above this share of income earns a note
pub const HOUSING_NOTE_PCT: f64 = 30.0;

/// Numbers computed locally so the narrative service never has to
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetMetrics {
    pub income: f64,
    pub total_expenses: f64,
    pub remaining: f64,
    pub savings: f64,
    pub savings_pct: f64,
    pub housing: f64,
    pub housing_pct: f64,
}

impl BudgetMetrics {
    pub fn from_budget(budget: &BudgetInput) -> Self {
        let savings = budget.expense(SAVINGS_CATEGORY);
        let housing = budget.expense(HOUSING_CATEGORY);
        Self {
            income: budget.monthly_income(),
            total_expenses: budget.total_expenses(),
            remaining: budget.remaining(),
            savings,
            savings_pct: budget.percent_of_income(savings),
            housing,
            housing_pct: budget.percent_of_income(housing),
        }
    }

    pub fn is_overspending(&self) -> bool {
        self.remaining < 0.0
    }

    pub fn is_zero_income(&self) -> bool {
        self.income == 0.0
    }

    pub fn is_low_income(&self) -> bool {
        self.income < LOW_INCOME_THRESHOLD
    }

    /// Saving 20% or more of income
    pub fn is_high_saver(&self) -> bool {
        self.savings_pct >= 20.0
    }

    /// Saving less than 10% of income
    pub fn is_low_saver(&self) -> bool {
        self.savings_pct >= 0.0 && self.savings_pct < 10.0
    }
}

/// Category key as shown to people: underscores become spaces, words title-cased
pub fn display_category(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    let mut prev_is_letter = false;
    for c in category.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Dollar amount with two decimals
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
