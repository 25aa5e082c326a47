//! Narrative reply parsing
//!
//! Replies come either as a JSON object (when the backend honours a response
//! schema) or as free text with `## SECTION` headings. Parsing never fails:
//! missing sections come back empty and the caller decides what to do.

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::SavingPlan;

use super::prompt::{FINANCIAL_ADVICE, SAVING_PLAN, SAVING_TIPS, WHERE_SAVINGS_COULD_GO};

/// Advice falls back to this many characters of the raw reply
const ADVICE_FALLBACK_CHARS: usize = 500;

/// The four narrative fields of an analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrative {
    pub financial_advice: String,
    pub saving_tips: Vec<String>,
    pub saving_plan: Option<SavingPlan>,
    pub where_savings_could_go: String,
}

/// Response schema requested from backends with structured output
pub fn narrative_schema() -> Value {
    let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    json!({
        "type": "OBJECT",
        "properties": {
            "financial_advice": {"type": "STRING"},
            "saving_tips": string_list,
            "saving_plan": {
                "type": "OBJECT",
                "properties": {
                    "months_1_3": string_list,
                    "months_4_6": string_list
                },
                "required": ["months_1_3", "months_4_6"]
            },
            "where_savings_could_go": {"type": "STRING"}
        },
        "required": [
            "financial_advice",
            "saving_tips",
            "saving_plan",
            "where_savings_could_go"
        ],
        "propertyOrdering": [
            "financial_advice",
            "saving_tips",
            "saving_plan",
            "where_savings_could_go"
        ]
    })
}

#[derive(Debug, Deserialize)]
struct StructuredNarrative {
    #[serde(default)]
    financial_advice: String,
    #[serde(default)]
    saving_tips: Vec<String>,
    #[serde(default)]
    saving_plan: Option<SavingPlan>,
    #[serde(default)]
    where_savings_could_go: String,
}

/// Parse a narrative reply, trying JSON first and section headings second
pub fn parse_narrative(text: &str) -> Narrative {
    if let Some(narrative) = parse_structured(text) {
        return narrative;
    }
    parse_sections(text)
}

/// Parse a JSON reply; `None` when the text is not a usable narrative object
pub fn parse_structured(text: &str) -> Option<Narrative> {
    let text = text.trim();
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }

    let raw: StructuredNarrative = serde_json::from_str(&text[start..=end]).ok()?;
    let financial_advice = raw.financial_advice.trim().to_string();
    if financial_advice.is_empty() {
        return None;
    }

    let saving_plan = raw
        .saving_plan
        .map(|plan| SavingPlan {
            months_1_3: clean_items(plan.months_1_3),
            months_4_6: clean_items(plan.months_4_6),
        })
        .filter(|plan| !plan.months_1_3.is_empty() || !plan.months_4_6.is_empty());

    Some(Narrative {
        financial_advice,
        saving_tips: clean_items(raw.saving_tips),
        saving_plan,
        where_savings_could_go: raw.where_savings_could_go.trim().to_string(),
    })
}

/// Parse a free-text reply with `## SECTION` headings
pub fn parse_sections(text: &str) -> Narrative {
    let mut financial_advice = section_body(text, FINANCIAL_ADVICE)
        .unwrap_or_default()
        .to_string();
    if financial_advice.is_empty() {
        financial_advice = text.trim().chars().take(ADVICE_FALLBACK_CHARS).collect();
    }

    let saving_tips = section_body(text, SAVING_TIPS)
        .map(bullet_lines)
        .unwrap_or_default();

    let saving_plan = section_body(text, SAVING_PLAN).and_then(parse_plan);

    let where_savings_could_go = section_body(text, WHERE_SAVINGS_COULD_GO)
        .unwrap_or_default()
        .to_string();

    Narrative {
        financial_advice,
        saving_tips,
        saving_plan,
        where_savings_could_go,
    }
}

/// Trimmed body of a section, or `None` when its header is absent
///
/// The header may carry a parenthetical suffix such as `(3-6 MONTHS)`. The
/// body runs to the next `## ` header, a `Disclaimer:` line, or the end.
fn section_body<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let header = Regex::new(&format!(
        r"(?i)##[ \t]*{}(?:[ \t]*\([^)\n]*\))?[ \t:]*(?:\r?\n|$)",
        regex::escape(name)
    ))
    .ok()?;
    let start = header.find(text)?.end();
    let rest = &text[start..];

    let end = Regex::new(r"(?im)^[ \t]*(?:##\s|disclaimer:)")
        .ok()
        .and_then(|re| re.find(rest))
        .map(|m| m.start())
        .unwrap_or(rest.len());

    Some(rest[..end].trim())
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_whitespace())
        .trim()
}

fn bullet_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|item| strip_bullet(item))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a plan body on its "Months 1-3" and "Months 4-6" markers
///
/// A missing marker leaves that phase empty; with neither marker there is no
/// plan at all.
fn parse_plan(body: &str) -> Option<SavingPlan> {
    let first = Regex::new(r#"(?i)"?Months?\s*1\s*[-–]\s*3"?\s*[:\-]?"#).ok();
    let second = Regex::new(r#"(?i)"?Months?\s*4\s*[-–]\s*6"?\s*[:\-]?"#).ok();

    let first_match = first.as_ref().and_then(|re| re.find(body));
    let second_match = second.as_ref().and_then(|re| re.find(body));
    if first_match.is_none() && second_match.is_none() {
        return None;
    }

    let months_1_3 = first_match
        .map(|m| {
            let rest = &body[m.end()..];
            let end = second
                .as_ref()
                .and_then(|re| re.find(rest))
                .map(|n| n.start())
                .unwrap_or(rest.len());
            bullet_lines(&rest[..end])
        })
        .unwrap_or_default();

    let months_4_6 = second_match
        .map(|m| bullet_lines(&body[m.end()..]))
        .unwrap_or_default();

    Some(SavingPlan {
        months_1_3,
        months_4_6,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MOCK_BUDGET_NARRATIVE;

    const REPLY: &str = "## FINANCIAL ADVICE
You keep $1300.00 after expenses, which is a strong base.

## SAVING TIPS
- Move $100 to savings on payday
* Cook at home twice more each week
• Review subscriptions

## SAVING PLAN (3-6 MONTHS)
Months 1-3:
- Build a $1000 starter emergency fund
- Raise savings to 12%
Months 4-6:
- Raise savings to 15%

## WHERE SAVINGS COULD GO
High-yield savings accounts are a common first stop. Talk to a licensed financial advisor for your situation.

Disclaimer: This is for education only and is not financial advice.";

    #[test]
    fn test_parse_all_sections() {
        let n = parse_narrative(REPLY);
        assert_eq!(
            n.financial_advice,
            "You keep $1300.00 after expenses, which is a strong base."
        );
        assert_eq!(
            n.saving_tips,
            vec![
                "Move $100 to savings on payday",
                "Cook at home twice more each week",
                "Review subscriptions"
            ]
        );
        let plan = n.saving_plan.unwrap();
        assert_eq!(
            plan.months_1_3,
            vec!["Build a $1000 starter emergency fund", "Raise savings to 12%"]
        );
        assert_eq!(plan.months_4_6, vec!["Raise savings to 15%"]);
        assert!(n.where_savings_could_go.starts_with("High-yield"));
        assert!(!n.where_savings_could_go.contains("Disclaimer"));
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let n = parse_sections("## financial advice\nSpend less.\n## Saving Tips\n- one\n");
        assert_eq!(n.financial_advice, "Spend less.");
        assert_eq!(n.saving_tips, vec!["one"]);
    }

    #[test]
    fn test_empty_section_stops_at_next_header() {
        let n = parse_sections("## FINANCIAL ADVICE\nSave more.\n## SAVING TIPS\n## SAVING PLAN\nMonths 4-6: invest\n");
        assert!(n.saving_tips.is_empty());
        assert_eq!(n.saving_plan.unwrap().months_4_6, vec!["invest"]);
    }

    #[test]
    fn test_missing_plan_header_gives_none() {
        let n = parse_sections("## FINANCIAL ADVICE\nKeep going.\n## SAVING TIPS\n- a\n");
        assert!(n.saving_plan.is_none());
        assert!(n.where_savings_could_go.is_empty());
    }

    #[test]
    fn test_plan_without_markers_gives_none() {
        let n = parse_sections(
            "## FINANCIAL ADVICE\nok\n\n## SAVING PLAN (3-6 MONTHS)\n- Save more each month\n- Cut takeout\n\n## WHERE SAVINGS COULD GO\nx\n",
        );
        assert!(n.saving_plan.is_none());
        assert_eq!(n.where_savings_could_go, "x");

        let n = parse_sections("## SAVING PLAN\n## WHERE SAVINGS COULD GO\nx\n");
        assert!(n.saving_plan.is_none());
    }

    #[test]
    fn test_plan_with_one_marker() {
        let n = parse_sections("## SAVING PLAN\nMonths 1-3: trim takeout\n");
        let plan = n.saving_plan.unwrap();
        assert_eq!(plan.months_1_3, vec!["trim takeout"]);
        assert!(plan.months_4_6.is_empty());
    }

    #[test]
    fn test_plan_with_quoted_markers() {
        let n = parse_sections(
            "## SAVING PLAN (3-6 MONTHS)\n- \"Months 1-3\": save 5%\n- \"Months 4-6\": save 8%\n",
        );
        let plan = n.saving_plan.unwrap();
        assert_eq!(plan.months_1_3, vec!["save 5%"]);
        assert_eq!(plan.months_4_6, vec!["save 8%"]);
    }

    #[test]
    fn test_advice_falls_back_to_raw_text() {
        let raw = "x".repeat(800);
        let n = parse_sections(&raw);
        assert_eq!(n.financial_advice.len(), 500);
        assert!(n.saving_tips.is_empty());
        assert!(n.saving_plan.is_none());
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_narrative(REPLY), parse_narrative(REPLY));
        assert_eq!(
            parse_narrative(MOCK_BUDGET_NARRATIVE),
            parse_narrative(MOCK_BUDGET_NARRATIVE)
        );
    }

    #[test]
    fn test_mock_narrative_parses_fully() {
        let n = parse_narrative(MOCK_BUDGET_NARRATIVE);
        assert!(!n.financial_advice.is_empty());
        assert!(!n.saving_tips.is_empty());
        let plan = n.saving_plan.unwrap();
        assert!(!plan.months_1_3.is_empty());
        assert!(!plan.months_4_6.is_empty());
        assert!(!n.where_savings_could_go.is_empty());
    }

    #[test]
    fn test_parse_structured_reply() {
        let reply = r#"```json
{"financial_advice": " Good start. ", "saving_tips": ["- Pay yourself first", ""],
 "saving_plan": {"months_1_3": ["save 10%"], "months_4_6": []},
 "where_savings_could_go": "Index funds."}
```"#;
        let n = parse_narrative(reply);
        assert_eq!(n.financial_advice, "Good start.");
        assert_eq!(n.saving_tips, vec!["Pay yourself first"]);
        let plan = n.saving_plan.unwrap();
        assert_eq!(plan.months_1_3, vec!["save 10%"]);
        assert!(plan.months_4_6.is_empty());
        assert_eq!(n.where_savings_could_go, "Index funds.");
    }

    #[test]
    fn test_structured_empty_plan_is_none() {
        let reply = r#"{"financial_advice": "ok", "saving_tips": [],
            "saving_plan": {"months_1_3": [], "months_4_6": []}, "where_savings_could_go": ""}"#;
        assert!(parse_narrative(reply).saving_plan.is_none());
    }

    #[test]
    fn test_structured_without_advice_uses_sections() {
        let reply = "## FINANCIAL ADVICE\nUse {braces} carefully.\n";
        assert_eq!(parse_narrative(reply).financial_advice, "Use {braces} carefully.");
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = narrative_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
        assert_eq!(
            schema["properties"]["saving_plan"]["properties"]["months_1_3"]["type"],
            "ARRAY"
        );
    }
}
