//! Short budgeting Q&A

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{generate_text, AIBackend, GenerationOptions};
use crate::config::TaskSettings;
use crate::error::{Error, Result};

/// Optional facts about the person asking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub goal: Option<String>,
}

impl ChatContext {
    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(income) = self.monthly_income {
            lines.push(format!("- Monthly income: ${}", income));
        }
        if let Some(goal) = self.goal.as_deref().filter(|g| !g.is_empty()) {
            lines.push(format!("- Goal: {}", goal));
        }
        lines
    }
}

pub fn build_chat_prompt(message: &str, context: &ChatContext) -> String {
    let lines = context.lines();
    let context_text = if lines.is_empty() {
        "No additional context.".to_string()
    } else {
        lines.join("\n")
    };

    format!(
        "User question:
{message}

User context:
{context_text}

Answer in 3-6 short sentences. Use simple language. Focus on practical budgeting and saving steps."
    )
}

/// Reply used when generation fails
pub fn fallback_reply(context: &ChatContext) -> String {
    let mut reply = String::from(
        "I’m having trouble reaching the AI service right now, \
         so here’s a general budgeting suggestion instead.\n\n",
    );
    if let Some(income) = context.monthly_income.filter(|i| *i != 0.0) {
        reply.push_str(&format!(
            "Based on a monthly income of ${}, start by aiming to save 10–20% each month if you can. ",
            income
        ));
    }
    reply.push_str(
        "Pick one or two categories to focus on (like food or entertainment), track what you \
         actually spend for a month, and then set a small, realistic reduction goal for next \
         month (for example, $25–$50 less). Automating a transfer to savings on payday is one of \
         the easiest ways to make progress without having to think about it every time.",
    );
    reply
}

/// Answer a budgeting question
///
/// Fails with `ServiceUnavailable` when no backend is configured and with
/// `InvalidRequest` for an empty message. Generation failures return the
/// fallback reply.
pub async fn chat_reply<B>(
    ai: Option<&B>,
    message: &str,
    context: &ChatContext,
    settings: &TaskSettings,
) -> Result<String>
where
    B: AIBackend + ?Sized,
{
    if ai.is_none() {
        return Err(Error::ServiceUnavailable(
            "Chatbot is currently unavailable.".to_string(),
        ));
    }
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::InvalidRequest("message is required".to_string()));
    }

    let prompt = build_chat_prompt(message, context);
    let options = GenerationOptions::from_settings(settings);
    match generate_text(ai, &prompt, &options).await {
        Ok(text) => Ok(text.trim().to_string()),
        Err(e) => {
            warn!("Chat generation failed, using fallback reply: {}", e);
            Ok(fallback_reply(context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    #[test]
    fn test_prompt_with_context() {
        let context = ChatContext {
            monthly_income: Some(3000.0),
            goal: Some("emergency_fund".into()),
        };
        let prompt = build_chat_prompt("How do I cut food costs?", &context);
        assert!(prompt.starts_with("User question:\nHow do I cut food costs?\n"));
        assert!(prompt.contains("- Monthly income: $3000\n- Goal: emergency_fund"));
        assert!(prompt.ends_with("practical budgeting and saving steps."));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_chat_prompt("hi", &ChatContext::default());
        assert!(prompt.contains("User context:\nNo additional context."));
    }

    #[test]
    fn test_zero_income_still_listed_in_prompt() {
        let context = ChatContext {
            monthly_income: Some(0.0),
            goal: Some(String::new()),
        };
        let prompt = build_chat_prompt("hi", &context);
        assert!(prompt.contains("- Monthly income: $0"));
        assert!(!prompt.contains("- Goal:"));
    }

    #[test]
    fn test_fallback_mentions_income() {
        let with_income = fallback_reply(&ChatContext {
            monthly_income: Some(2500.5),
            goal: None,
        });
        assert!(with_income.contains("monthly income of $2500.5"));

        let zero = fallback_reply(&ChatContext {
            monthly_income: Some(0.0),
            goal: None,
        });
        assert!(!zero.contains("monthly income of"));
        assert!(zero.contains("Automating a transfer to savings"));
    }

    #[tokio::test]
    async fn test_chat_reply_unavailable() {
        let err = chat_reply::<MockBackend>(None, "hello", &ChatContext::default(), &TaskSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_chat_reply_empty_message() {
        let mock = MockBackend::new();
        let err = chat_reply(Some(&mock), "   ", &ChatContext::default(), &TaskSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(mock.last_prompt().is_none());
    }

    #[tokio::test]
    async fn test_chat_reply_trims_generated_text() {
        let mock = MockBackend::with_reply("  Save a little each week.  \n");
        let reply = chat_reply(Some(&mock), " tips? ", &ChatContext::default(), &TaskSettings::default())
            .await
            .unwrap();
        assert_eq!(reply, "Save a little each week.");
        assert!(mock.last_prompt().unwrap().starts_with("User question:\ntips?\n"));
    }

    #[tokio::test]
    async fn test_chat_reply_falls_back_on_failure() {
        let mock = MockBackend::failing("quota");
        let context = ChatContext {
            monthly_income: Some(3000.0),
            goal: None,
        };
        let reply = chat_reply(Some(&mock), "help", &context, &TaskSettings::default())
            .await
            .unwrap();
        assert_eq!(reply, fallback_reply(&context));
    }
}
