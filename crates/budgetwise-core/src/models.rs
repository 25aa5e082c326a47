//! Data models for Budgetwise

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What the user is saving toward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    General,
    EmergencyFund,
    DebtPayoff,
    BigPurchase,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::EmergencyFund => "emergency_fund",
            Self::DebtPayoff => "debt_payoff",
            Self::BigPurchase => "big_purchase",
        }
    }

    /// Human-readable description used in prompts
    pub fn description(&self) -> &'static str {
        match self {
            Self::General => "general financial wellness",
            Self::EmergencyFund => "building an emergency fund (3-6 months of expenses)",
            Self::DebtPayoff => "paying down debt",
            Self::BigPurchase => "saving for a big purchase (e.g. laptop, car, down payment)",
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "emergency_fund" => Ok(Self::EmergencyFund),
            "debt_payoff" => Ok(Self::DebtPayoff),
            "big_purchase" => Ok(Self::BigPurchase),
            other => Err(Error::InvalidRequest(format!("unknown goal: {}", other))),
        }
    }
}

/// A user's monthly budget
///
/// Immutable once constructed. Use [`BudgetInput::new`] or deserialize from JSON;
/// both paths reject negative or non-finite amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBudgetInput")]
pub struct BudgetInput {
    monthly_income: f64,
    expenses: BTreeMap<String, f64>,
    goal: Goal,
}

/// Unvalidated wire form of [`BudgetInput`]
#[derive(Debug, Deserialize)]
struct RawBudgetInput {
    monthly_income: f64,
    #[serde(default)]
    expenses: BTreeMap<String, f64>,
    #[serde(default)]
    goal: Goal,
}

impl TryFrom<RawBudgetInput> for BudgetInput {
    type Error = Error;

    fn try_from(raw: RawBudgetInput) -> Result<Self, Self::Error> {
        Self::new(raw.monthly_income, raw.expenses, raw.goal)
    }
}

impl BudgetInput {
    pub fn new(
        monthly_income: f64,
        expenses: BTreeMap<String, f64>,
        goal: Goal,
    ) -> Result<Self, Error> {
        if !monthly_income.is_finite() || monthly_income < 0.0 {
            return Err(Error::InvalidRequest(
                "monthly_income must be a non-negative number".into(),
            ));
        }
        for (category, amount) in &expenses {
            if category.trim().is_empty() {
                return Err(Error::InvalidRequest(
                    "expense category names must not be empty".into(),
                ));
            }
            if !amount.is_finite() || *amount < 0.0 {
                return Err(Error::InvalidRequest(format!(
                    "expense '{}' must be a non-negative number",
                    category
                )));
            }
        }
        Ok(Self {
            monthly_income,
            expenses,
            goal,
        })
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn expenses(&self) -> &BTreeMap<String, f64> {
        &self.expenses
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Amount for a category, 0 if absent
    pub fn expense(&self, category: &str) -> f64 {
        self.expenses.get(category).copied().unwrap_or(0.0)
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.values().sum()
    }

    /// Income minus expenses (negative when overspending)
    pub fn remaining(&self) -> f64 {
        self.monthly_income - self.total_expenses()
    }

    /// Share of income, in percent. 0 when income is 0.
    pub fn percent_of_income(&self, amount: f64) -> f64 {
        if self.monthly_income > 0.0 {
            amount * 100.0 / self.monthly_income
        } else {
            0.0
        }
    }

    /// Expenses sorted by amount, largest first (ties keep category order)
    pub fn expenses_by_amount(&self) -> Vec<(&str, f64)> {
        let mut sorted: Vec<(&str, f64)> = self
            .expenses
            .iter()
            .map(|(category, amount)| (category.as_str(), *amount))
            .collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted
    }
}

/// One row of the expense breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub category: String,
    pub amount: f64,
    /// Percent of income, rounded to one decimal
    pub percentage: f64,
}

/// Two-phase saving plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingPlan {
    #[serde(default)]
    pub months_1_3: Vec<String>,
    #[serde(default)]
    pub months_4_6: Vec<String>,
}

/// Result of a budget analysis
///
/// The shape is the same whether the narrative came from the service or from
/// the rule-based fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub financial_advice: String,
    pub saving_tips: Vec<String>,
    pub saving_plan: Option<SavingPlan>,
    pub where_savings_could_go: String,
    pub breakdown: Vec<BreakdownItem>,
    pub insights: Vec<String>,
    pub goal: Goal,
}

/// A financial glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub id: i64,
    pub term: String,
    pub definition: String,
    pub category: String,
}

/// Reading level for term explanations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse a user-supplied level; anything unrecognised becomes `Beginner`
    pub fn parse_lossy(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("intermediate") => Self::Intermediate,
            Some("advanced") => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expenses(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_budget_derived_totals() {
        let budget = BudgetInput::new(
            3000.0,
            expenses(&[("rent", 1000.0), ("food", 400.0), ("savings", 300.0)]),
            Goal::EmergencyFund,
        )
        .unwrap();
        assert_eq!(budget.total_expenses(), 1700.0);
        assert_eq!(budget.remaining(), 1300.0);
        assert_eq!(budget.percent_of_income(300.0), 10.0);
    }

    #[test]
    fn test_budget_remaining_can_be_negative() {
        let budget = BudgetInput::new(0.0, expenses(&[("food", 200.0)]), Goal::General).unwrap();
        assert_eq!(budget.remaining(), -200.0);
        assert_eq!(budget.percent_of_income(200.0), 0.0);
    }

    #[test]
    fn test_budget_rejects_negative_amounts() {
        assert!(BudgetInput::new(-1.0, BTreeMap::new(), Goal::General).is_err());
        let err = BudgetInput::new(100.0, expenses(&[("food", -5.0)]), Goal::General);
        assert!(matches!(err, Err(Error::InvalidRequest(_))));
        assert!(BudgetInput::new(f64::NAN, BTreeMap::new(), Goal::General).is_err());
    }

    #[test]
    fn test_budget_deserialize_validates() {
        let json = r#"{"monthly_income": 2500, "expenses": {"rent": 900}, "goal": "debt_payoff"}"#;
        let budget: BudgetInput = serde_json::from_str(json).unwrap();
        assert_eq!(budget.goal(), Goal::DebtPayoff);
        assert_eq!(budget.expense("rent"), 900.0);
        assert_eq!(budget.expense("savings"), 0.0);

        let bad = r#"{"monthly_income": 2500, "expenses": {"rent": -900}}"#;
        assert!(serde_json::from_str::<BudgetInput>(bad).is_err());
    }

    #[test]
    fn test_budget_goal_defaults_to_general() {
        let budget: BudgetInput = serde_json::from_str(r#"{"monthly_income": 100}"#).unwrap();
        assert_eq!(budget.goal(), Goal::General);
        assert!(budget.expenses().is_empty());
    }

    #[test]
    fn test_unknown_goal_rejected() {
        let json = r#"{"monthly_income": 100, "goal": "retire_early"}"#;
        assert!(serde_json::from_str::<BudgetInput>(json).is_err());
        assert!("retire_early".parse::<Goal>().is_err());
        assert_eq!("Emergency_Fund".parse::<Goal>().unwrap(), Goal::EmergencyFund);
    }

    #[test]
    fn test_expenses_by_amount_descending() {
        let budget = BudgetInput::new(
            1000.0,
            expenses(&[("a", 10.0), ("b", 300.0), ("c", 50.0)]),
            Goal::General,
        )
        .unwrap();
        let sorted: Vec<&str> = budget.expenses_by_amount().iter().map(|(c, _)| *c).collect();
        assert_eq!(sorted, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_complexity_parse_lossy() {
        assert_eq!(Complexity::parse_lossy(None), Complexity::Beginner);
        assert_eq!(Complexity::parse_lossy(Some("ADVANCED")), Complexity::Advanced);
        assert_eq!(Complexity::parse_lossy(Some("expert")), Complexity::Beginner);
    }

    #[test]
    fn test_analysis_result_serializes_null_plan() {
        let result = AnalysisResult {
            financial_advice: "x".into(),
            saving_tips: vec![],
            saving_plan: None,
            where_savings_could_go: String::new(),
            breakdown: vec![],
            insights: vec![],
            goal: Goal::BigPurchase,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["saving_plan"].is_null());
        assert_eq!(json["goal"], "big_purchase");
    }
}
