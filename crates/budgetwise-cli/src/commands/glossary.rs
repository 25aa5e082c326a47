//! Glossary and term explanation commands

use anyhow::{Context, Result};
use budgetwise_core::glossary::fallback_explanation;
use budgetwise_core::{explain_term, ExplainRequest, GenerationConfig, Glossary, Task};

use super::ai_from_env;

pub fn cmd_glossary(id: Option<i64>, category: Option<&str>, search: Option<&str>) -> Result<()> {
    let glossary = Glossary::builtin().context("Failed to load glossary")?;

    if let Some(id) = id {
        let term = glossary
            .get(id)
            .with_context(|| format!("Term with ID {} not found", id))?;
        println!("{} [{}]", term.term, term.category);
        println!("   {}", term.definition);
        return Ok(());
    }

    let terms = glossary.list(category, search);
    if terms.is_empty() {
        println!("No matching terms.");
        return Ok(());
    }

    println!();
    println!("📖 Glossary ({} terms)", terms.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for term in terms {
        println!("   {:>2}. {:<20} {}", term.id, term.term, term.definition);
    }
    Ok(())
}

pub async fn cmd_explain(
    term: &str,
    complexity: Option<&str>,
    question: Option<&str>,
    generation: &GenerationConfig,
) -> Result<()> {
    let glossary = Glossary::builtin().context("Failed to load glossary")?;
    let ai = ai_from_env(generation);

    if ai.is_none() {
        println!("ℹ️  Narrative backend not configured (set GEMINI_API_KEY); showing the stored definition.");
        println!();
        let definition = glossary
            .find_by_term(term)
            .map(|t| t.definition.as_str())
            .unwrap_or_default();
        println!("{}", fallback_explanation(term.trim(), definition, question));
        return Ok(());
    }

    let request = ExplainRequest {
        term: Some(term.to_string()),
        complexity: complexity.map(str::to_string),
        custom_prompt: question.map(str::to_string),
    };
    let explanation =
        explain_term(ai.as_ref(), &glossary, &request, &generation.task(Task::Explain)).await?;

    println!("📖 {} ({})", explanation.term, explanation.complexity);
    println!();
    println!("{}", explanation.explanation);
    Ok(())
}
