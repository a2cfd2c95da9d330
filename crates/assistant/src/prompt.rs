use chrono::NaiveDate;

use crate::parse::CategoryOption;

fn join_names(options: &[CategoryOption]) -> String {
    options
        .iter()
        .map(|o| o.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt for turning free text into a structured transaction.
///
/// The category lists pin the model to names that actually exist; anything
/// else it answers is reconciled to a fallback afterwards.
pub(crate) fn parse_transaction_prompt(
    text: &str,
    today: NaiveDate,
    expense_options: &[CategoryOption],
    income_options: &[CategoryOption],
) -> String {
    format!(
        "You are a transaction parser for a personal budget tracker. \
Parse the following text into a single financial transaction.\n\
\n\
Text: \"{text}\"\n\
Today's date: {today}\n\
\n\
Expense categories: {expense}\n\
Income categories: {income}\n\
\n\
Respond with ONLY a JSON object, no other text:\n\
{{\n\
  \"type\": \"income\" or \"expense\",\n\
  \"amount\": number (in pesos, no currency symbol),\n\
  \"description\": \"short description\",\n\
  \"category\": \"one category name from the lists above\",\n\
  \"date\": \"YYYY-MM-DD\" (resolve relative dates like 'yesterday' against today's date),\n\
  \"paymentMethod\": \"cash|credit_card|debit_card|bank_transfer|gcash|paymaya|grabpay|other\" or null,\n\
  \"location\": \"place name\" or null,\n\
  \"tags\": [\"up to 8 short tags\"],\n\
  \"confidence\": number between 0 and 1\n\
}}",
        expense = join_names(expense_options),
        income = join_names(income_options),
    )
}

/// Prompt for suggesting a category for a bare description.
pub(crate) fn categorize_prompt(description: &str, options: &[CategoryOption]) -> String {
    format!(
        "You are a categorization helper for a personal budget tracker. \
Pick the single best category for this transaction description.\n\
\n\
Description: \"{description}\"\n\
Categories: {names}\n\
\n\
Respond with ONLY a JSON object, no other text:\n\
{{\n\
  \"category\": \"one category name from the list above\",\n\
  \"confidence\": number between 0 and 1\n\
}}",
        names = join_names(options),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

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
    fn parse_prompt_lists_both_category_sides() {
        let today = "2026-02-14".parse().unwrap();
        let prompt = parse_transaction_prompt(
            "spent 250 on groceries",
            today,
            &options(&["Groceries", "Dining Out"]),
            &options(&["Salary"]),
        );
        assert!(prompt.contains("Groceries, Dining Out"));
        assert!(prompt.contains("Salary"));
        assert!(prompt.contains("2026-02-14"));
    }

    #[test]
    fn categorize_prompt_lists_categories() {
        let prompt = categorize_prompt("jeepney fare", &options(&["Transportation", "Other"]));
        assert!(prompt.contains("Transportation, Other"));
        assert!(prompt.contains("jeepney fare"));
    }
}
