use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::prompt::{categorize_prompt, parse_transaction_prompt};
use crate::{Assistant, AssistantError, ResultAssistant};

/// A category the assistant may pick from.
#[derive(Clone, Debug)]
pub struct CategoryOption {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedKind {
    Income,
    Expense,
}

/// A structured transaction draft parsed from free text.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTransaction {
    pub kind: ParsedKind,
    pub amount_minor: i64,
    pub description: String,
    /// `None` when even the fallback category was missing from the options.
    pub category_id: Option<Uuid>,
    pub category_name: String,
    pub transaction_date: NaiveDate,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f64,
}

/// A category suggestion for an existing description.
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySuggestion {
    pub category_id: Option<Uuid>,
    pub category_name: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParsedTransaction {
    #[serde(rename = "type")]
    kind: ParsedKind,
    amount: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    category: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Pulls the JSON object out of a model answer.
///
/// Models wrap answers in ``` fences or add chatter around them; the first
/// `{` through the last `}` is taken as the payload.
fn extract_json(raw: &str) -> ResultAssistant<&str> {
    let stripped = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let start = stripped
        .find('{')
        .ok_or_else(|| AssistantError::Malformed("no JSON object in answer".to_string()))?;
    let end = stripped
        .rfind('}')
        .ok_or_else(|| AssistantError::Malformed("no JSON object in answer".to_string()))?;
    if end < start {
        return Err(AssistantError::Malformed(
            "no JSON object in answer".to_string(),
        ));
    }
    Ok(&stripped[start..=end])
}

/// Converts a major-unit amount to centavos, rounding half away from zero.
fn major_to_minor(amount: f64) -> ResultAssistant<i64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AssistantError::Malformed(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    let minor = (amount * 100.0).round();
    if minor > i64::MAX as f64 {
        return Err(AssistantError::Malformed(format!(
            "amount out of range: {amount}"
        )));
    }
    Ok(minor as i64)
}

fn clamp_confidence(confidence: Option<f64>) -> f64 {
    confidence.unwrap_or(0.5).clamp(0.0, 1.0)
}

/// Matches the model's category name against the caller's options,
/// case-insensitively. Unknown names fall back to `fallback_name`, or to
/// the first option when the fallback itself is absent, with zero
/// confidence; `matched` tells the caller which happened.
fn reconcile_category(
    answer: &str,
    options: &[CategoryOption],
    fallback_name: &str,
) -> (Option<Uuid>, String, bool) {
    let wanted = answer.trim();
    if !wanted.is_empty() {
        for option in options {
            if option.name.eq_ignore_ascii_case(wanted) {
                return (Some(option.id), option.name.clone(), true);
            }
        }
    }
    for option in options {
        if option.name.eq_ignore_ascii_case(fallback_name) {
            return (Some(option.id), option.name.clone(), false);
        }
    }
    if let Some(option) = options.first() {
        return (Some(option.id), option.name.clone(), false);
    }
    (None, fallback_name.to_string(), false)
}

fn parse_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(today)
}

fn clean_tags(tags: Vec<String>, max: usize) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(max)
        .collect()
}

impl Assistant {
    /// Parses free text into a transaction draft.
    ///
    /// `expense_options` and `income_options` are the active categories on
    /// each side, and must contain the fallbacks (`Other` / `Other Income`)
    /// for unknown categories to land somewhere.
    pub async fn parse_transaction(
        &self,
        text: &str,
        today: NaiveDate,
        expense_options: &[CategoryOption],
        income_options: &[CategoryOption],
    ) -> ResultAssistant<ParsedTransaction> {
        let prompt = parse_transaction_prompt(text, today, expense_options, income_options);
        let answer = self.generate(&prompt).await?;
        let json = extract_json(&answer)?;
        let raw: RawParsedTransaction = serde_json::from_str(json)
            .map_err(|err| AssistantError::Malformed(format!("bad transaction JSON: {err}")))?;

        let (options, fallback) = match raw.kind {
            ParsedKind::Expense => (expense_options, "Other"),
            ParsedKind::Income => (income_options, "Other Income"),
        };
        let (category_id, category_name, matched) =
            reconcile_category(&raw.category, options, fallback);
        if !matched {
            warn!(answer = %raw.category, "assistant category did not match, using fallback");
        }
        let confidence = if matched {
            clamp_confidence(raw.confidence)
        } else {
            0.0
        };

        Ok(ParsedTransaction {
            kind: raw.kind,
            amount_minor: major_to_minor(raw.amount)?,
            description: raw.description.trim().to_string(),
            category_id,
            category_name,
            transaction_date: parse_date(raw.date.as_deref(), today),
            payment_method: raw
                .payment_method
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            location: raw
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            tags: clean_tags(raw.tags, 8),
            confidence,
        })
    }

    /// Suggests a category for a description, from one side of the ledger.
    ///
    /// `fallback` names the catch-all to use when the model's answer does
    /// not match any option.
    pub async fn categorize(
        &self,
        description: &str,
        options: &[CategoryOption],
        fallback: &str,
    ) -> ResultAssistant<CategorySuggestion> {
        let prompt = categorize_prompt(description, options);
        let answer = self.generate(&prompt).await?;
        let json = extract_json(&answer)?;
        let raw: RawSuggestion = serde_json::from_str(json)
            .map_err(|err| AssistantError::Malformed(format!("bad suggestion JSON: {err}")))?;

        let (category_id, category_name, matched) =
            reconcile_category(&raw.category, options, fallback);
        let confidence = if matched {
            clamp_confidence(raw.confidence)
        } else {
            0.0
        };
        Ok(CategorySuggestion {
            category_id,
            category_name,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(names: &[&str]) -> Vec<CategoryOption> {
        names
            .iter()
            .map(|name| CategoryOption {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
            })
            .collect()
    }

    #[test]
    fn extract_json_strips_fences_and_chatter() {
        assert_eq!(
            extract_json("```json\n{\"a\": 1}\n```").unwrap(),
            "{\"a\": 1}"
        );
        assert_eq!(
            extract_json("Sure! Here you go: {\"a\": 1} hope that helps").unwrap(),
            "{\"a\": 1}"
        );
        assert!(extract_json("no json here").is_err());
    }

    #[test]
    fn major_to_minor_rounds_half_away_from_zero() {
        assert_eq!(major_to_minor(250.0).unwrap(), 25_000);
        assert_eq!(major_to_minor(0.005).unwrap(), 1);
        assert_eq!(major_to_minor(10.125).unwrap(), 1013);
        assert!(major_to_minor(0.0).is_err());
        assert!(major_to_minor(-5.0).is_err());
        assert!(major_to_minor(f64::NAN).is_err());
    }

    #[test]
    fn reconcile_matches_case_insensitively() {
        let opts = options(&["Groceries", "Other"]);
        let (id, name, matched) = reconcile_category("groceries", &opts, "Other");
        assert_eq!(id, Some(opts[0].id));
        assert_eq!(name, "Groceries");
        assert!(matched);
    }

    #[test]
    fn reconcile_falls_back_to_other() {
        let opts = options(&["Groceries", "Other"]);
        let (id, name, matched) = reconcile_category("Spaceships", &opts, "Other");
        assert_eq!(id, Some(opts[1].id));
        assert_eq!(name, "Other");
        assert!(!matched);

    }

    #[test]
    fn reconcile_uses_first_option_when_other_is_missing() {
        let no_fallback = options(&["Groceries", "Transportation"]);
        let (id, name, matched) = reconcile_category("Spaceships", &no_fallback, "Other");
        assert_eq!(id, Some(no_fallback[0].id));
        assert_eq!(name, "Groceries");
        assert!(!matched);

        let (id, name, matched) = reconcile_category("Spaceships", &[], "Other");
        assert_eq!(id, None);
        assert_eq!(name, "Other");
        assert!(!matched);
    }

    #[test]
    fn raw_transaction_accepts_model_shape() {
        let json = r#"{
            "type": "expense",
            "amount": 250.5,
            "description": "groceries at SM",
            "category": "Groceries",
            "date": "2026-02-13",
            "paymentMethod": "gcash",
            "location": "SM North",
            "tags": ["grocery"],
            "confidence": 0.92
        }"#;
        let raw: RawParsedTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind, ParsedKind::Expense);
        assert_eq!(raw.payment_method.as_deref(), Some("gcash"));
    }

    #[test]
    fn dates_default_to_today_when_missing_or_bad() {
        let today: NaiveDate = "2026-02-14".parse().unwrap();
        assert_eq!(parse_date(None, today), today);
        assert_eq!(parse_date(Some("not a date"), today), today);
        assert_eq!(
            parse_date(Some("2026-02-13"), today),
            "2026-02-13".parse().unwrap()
        );
    }

    #[test]
    fn tags_are_trimmed_and_capped() {
        let tags = vec![
            "  a ".to_string(),
            String::new(),
            "b".to_string(),
        ];
        assert_eq!(clean_tags(tags, 8), vec!["a", "b"]);
        let many: Vec<String> = (0..12).map(|i| format!("t{i}")).collect();
        assert_eq!(clean_tags(many, 8).len(), 8);
    }
}
