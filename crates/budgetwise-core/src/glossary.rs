//! Financial glossary
//!
//! A small read-only term list embedded at build time, plus AI explanations
//! of terms with a rule-based fallback.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{generate_text, AIBackend, GenerationOptions};
use crate::config::TaskSettings;
use crate::error::{Error, Result};
use crate::models::{Complexity, GlossaryTerm};

const GLOSSARY_DATA: &str = include_str!("../../../data/glossary.toml");

#[derive(Debug, Deserialize)]
struct GlossaryFile {
    #[serde(default)]
    terms: Vec<GlossaryTerm>,
}

/// In-memory term list
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    terms: Vec<GlossaryTerm>,
}

impl Glossary {
    /// The glossary shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml(GLOSSARY_DATA)
    }

    /// Parse a `[[terms]]` TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: GlossaryFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid glossary data: {}", e)))?;

        let mut seen = HashSet::new();
        for term in &file.terms {
            if !seen.insert(term.id) {
                return Err(Error::Config(format!(
                    "Duplicate glossary id {}",
                    term.id
                )));
            }
        }

        Ok(Self { terms: file.terms })
    }

    pub fn terms(&self) -> &[GlossaryTerm] {
        &self.terms
    }

    /// Terms in an exact category and/or containing `search` in the term or
    /// definition (case-insensitive). Empty filters are ignored.
    pub fn list(&self, category: Option<&str>, search: Option<&str>) -> Vec<&GlossaryTerm> {
        let category = category.filter(|c| !c.is_empty());
        let search = search
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty());

        self.terms
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .filter(|t| {
                search.as_deref().map_or(true, |s| {
                    t.term.to_lowercase().contains(s) || t.definition.to_lowercase().contains(s)
                })
            })
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<&GlossaryTerm> {
        self.terms.iter().find(|t| t.id == id)
    }

    /// Case-insensitive exact match on the term name
    pub fn find_by_term(&self, name: &str) -> Option<&GlossaryTerm> {
        let name = name.trim().to_lowercase();
        self.terms.iter().find(|t| t.term.to_lowercase() == name)
    }
}

/// A request to explain a term
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

/// An explanation of a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub term: String,
    pub complexity: Complexity,
    pub explanation: String,
}

pub fn build_explain_prompt(
    term: &str,
    complexity: Complexity,
    definition: &str,
    custom_prompt: Option<&str>,
) -> String {
    match custom_prompt {
        Some(question) => format!(
            "The user is asking about the financial term \"{term}\".

Existing definition (if helpful): {definition}

User's specific question/request: {question}

Answer their question clearly and simply. Use 2-4 short paragraphs. Include examples if helpful. Do NOT recommend specific investments or products.
"
        ),
        None => format!(
            "Explain the financial term \"{term}\" for a {complexity} learner.

Existing definition (if helpful): {definition}

Rules:
- Use 2-3 short paragraphs max.
- Use simple, friendly language.
- Include ONE concrete example.
- Do NOT recommend specific investments or products.

Format:
- First paragraph: simple explanation.
- Second paragraph: example.
"
        ),
    }
}

/// Explanation built from the stored definition alone
pub fn fallback_explanation(term: &str, definition: &str, custom_prompt: Option<&str>) -> String {
    if definition.is_empty() {
        return format!(
            "{term} is a financial term. At the moment we don't have a detailed definition \
             stored, but it usually refers to a concept used in investing or budgeting."
        );
    }

    let mut explanation = format!("Here is a simple explanation of {term}:\n\n{definition}");
    if let Some(question) = custom_prompt {
        explanation.push_str(&format!(
            "\n\nIn the context of your question (“{question}”), think of {term} this way: {definition}"
        ));
    }
    explanation
}

/// Explain a term at the requested level
///
/// Fails with `ServiceUnavailable` when no backend is configured and with
/// `InvalidRequest` for an empty term. An unknown complexity becomes
/// beginner; generation failures return the fallback explanation.
pub async fn explain_term<B>(
    ai: Option<&B>,
    glossary: &Glossary,
    request: &ExplainRequest,
    settings: &TaskSettings,
) -> Result<Explanation>
where
    B: AIBackend + ?Sized,
{
    if ai.is_none() {
        return Err(Error::ServiceUnavailable(
            "AI explanations are currently unavailable.".to_string(),
        ));
    }

    let term = request.term.as_deref().unwrap_or_default().trim();
    if term.is_empty() {
        return Err(Error::InvalidRequest("term is required".to_string()));
    }
    let complexity = Complexity::parse_lossy(request.complexity.as_deref());
    let custom_prompt = request
        .custom_prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let definition = glossary
        .find_by_term(term)
        .map(|t| t.definition.as_str())
        .unwrap_or_default();

    let prompt = build_explain_prompt(term, complexity, definition, custom_prompt);
    let options = GenerationOptions::from_settings(settings);
    let explanation = match generate_text(ai, &prompt, &options).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(term, "Explanation generation failed, using fallback: {}", e);
            fallback_explanation(term, definition, custom_prompt)
        }
    };

    Ok(Explanation {
        term: term.to_string(),
        complexity,
        explanation,
    })
}
