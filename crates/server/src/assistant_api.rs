//! Assistant API endpoints.
//!
//! Both endpoints pass the active category names to the model and persist
//! nothing; clients confirm the draft and post it to the transactions API
//! themselves.

use api_types::assistant::{
    CategorizeRequest, CategorySuggestionResponse, ParseRequest, ParsedTransactionResponse,
};
use api_types::transaction::TransactionKind as ApiKind;
use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;

use crate::transactions::map_kind;
use crate::{ServerError, server::ServerState};
use assistant::{Assistant, CategoryOption, ParsedKind};
use engine::{Category, canonical_payment_method};

fn require_assistant(state: &ServerState) -> Result<Arc<Assistant>, ServerError> {
    state
        .assistant
        .clone()
        .ok_or(ServerError::AssistantUnavailable)
}

fn options(categories: &[Category]) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id,
            name: c.name.clone(),
        })
        .collect()
}

fn map_parsed_kind(kind: ParsedKind) -> engine::TransactionKind {
    match kind {
        ParsedKind::Income => engine::TransactionKind::Income,
        ParsedKind::Expense => engine::TransactionKind::Expense,
    }
}

pub async fn parse(
    State(state): State<ServerState>,
    Json(payload): Json<ParseRequest>,
) -> Result<Json<ParsedTransactionResponse>, ServerError> {
    let assistant = require_assistant(&state)?;
    let input = payload.input.trim();
    if input.is_empty() {
        return Err(ServerError::Generic("input must not be empty".to_string()));
    }

    let expense_categories = state.engine.list_categories(false, Some(false)).await?;
    let income_categories = state.engine.list_categories(false, Some(true)).await?;

    let parsed = assistant
        .parse_transaction(
            input,
            Utc::now().date_naive(),
            &options(&expense_categories),
            &options(&income_categories),
        )
        .await?;

    let category_id = parsed.category_id.ok_or_else(|| {
        ServerError::Generic(format!(
            "no category available for `{}`",
            parsed.category_name
        ))
    })?;

    Ok(Json(ParsedTransactionResponse {
        kind: map_kind(map_parsed_kind(parsed.kind)),
        amount_minor: parsed.amount_minor,
        description: parsed.description,
        category_id,
        category_name: parsed.category_name,
        transaction_date: parsed.transaction_date,
        payment_method: parsed.payment_method.map(|m| canonical_payment_method(&m)),
        location: parsed.location,
        tags: parsed.tags,
        confidence: parsed.confidence,
    }))
}

pub async fn categorize(
    State(state): State<ServerState>,
    Json(payload): Json<CategorizeRequest>,
) -> Result<Json<CategorySuggestionResponse>, ServerError> {
    let assistant = require_assistant(&state)?;
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(ServerError::Generic(
            "description must not be empty".to_string(),
        ));
    }

    let (is_income, fallback) = match payload.kind {
        ApiKind::Income => (true, engine::OTHER_INCOME),
        ApiKind::Expense => (false, engine::OTHER_EXPENSE),
    };
    let categories = state.engine.list_categories(false, Some(is_income)).await?;

    let suggestion = assistant
        .categorize(description, &options(&categories), fallback)
        .await?;

    let category_id = suggestion.category_id.ok_or_else(|| {
        ServerError::Generic(format!(
            "no category available for `{}`",
            suggestion.category_name
        ))
    })?;

    Ok(Json(CategorySuggestionResponse {
        category_id,
        category_name: suggestion.category_name,
        confidence: suggestion.confidence,
    }))
}
