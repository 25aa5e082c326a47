//! Mock backend for testing
//!
//! Provides predictable replies for every prompt kind.
//! Useful for unit tests and development without network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::GenerationOptions;
use super::AIBackend;

/// Canned four-section narrative returned for budget prompts
pub const MOCK_BUDGET_NARRATIVE: &str = "## FINANCIAL ADVICE
You are keeping expenses below income, which gives you room to grow savings. \
Your biggest lever is housing. Keep tracking your top categories each month.

## SAVING TIPS
- Move leftover money to savings on payday.
- Cook at home two more nights a week.
- Review subscriptions once a quarter.

## SAVING PLAN (3-6 MONTHS)
Months 1-3:
- Raise savings by 2% of income
- Build a starter emergency fund
Months 4-6:
- Raise savings by another 3%
- Put windfalls toward your goal

## WHERE SAVINGS COULD GO
After an emergency fund, people often look at high-yield savings accounts and \
retirement accounts. Talk to a licensed financial advisor for your situation.

Disclaimer: This is for education only and is not financial advice.";

/// Mock AI backend for testing
///
/// Returns predictable responses. Can be scripted with a fixed reply or set
/// to fail, and records the options of the last call.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: Option<String>,
    failure: Option<String>,
    structured_output: bool,
    last_options: Arc<Mutex<Option<GenerationOptions>>>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: None,
            failure: None,
            structured_output: true,
            last_options: Arc::new(Mutex::new(None)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Always return this reply
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::new()
        }
    }

    /// Always fail with a generation error
    pub fn failing(message: &str) -> Self {
        Self {
            healthy: false,
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Report structured output as unsupported
    pub fn without_structured_output(mut self) -> Self {
        self.structured_output = false;
        self
    }

    /// Options passed to the most recent `generate` call
    pub fn last_options(&self) -> Option<GenerationOptions> {
        self.last_options.lock().ok().and_then(|o| o.clone())
    }

    /// Prompt passed to the most recent `generate` call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(options.clone());
        }
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        if let Some(ref message) = self.failure {
            return Err(Error::Generation(message.clone()));
        }
        if let Some(ref reply) = self.reply {
            return Ok(reply.clone());
        }

        let reply = if prompt.contains("## FINANCIAL ADVICE") {
            MOCK_BUDGET_NARRATIVE.to_string()
        } else if prompt.contains("Explain the financial term") || prompt.contains("financial term \"") {
            "This term describes a basic money concept.\n\nFor example, setting aside $50 a month."
                .to_string()
        } else {
            "Track what you spend for a month, then pick one category to trim.".to_string()
        };
        Ok(reply)
    }

    fn supports_structured_output(&self) -> bool {
        self.structured_output
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
