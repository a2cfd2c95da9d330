//! Transactions API endpoints

use api_types::transaction::{
    CategoryRef, TransactionCreate, TransactionKind as ApiKind, TransactionListQuery,
    TransactionListResponse, TransactionUpdate, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Category, Transaction, TransactionListFilter};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn map_kind_in(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

pub(crate) fn category_ref(category: &Category) -> CategoryRef {
    CategoryRef {
        id: category.id,
        name: category.name.clone(),
        color: category.color.clone(),
        icon: category.icon.clone(),
        is_income: category.is_income,
    }
}

fn view(tx: Transaction, category: &Category) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        transaction_date: tx.transaction_date,
        description: tx.description,
        payment_method: tx.payment_method,
        location: tx.location,
        tags: tx.tags,
        category: category_ref(category),
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ServerError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ServerError::Generic(format!("invalid month: {year}-{month:02}")))
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Resolves the query's date selection into the engine's `[from, to)` range.
///
/// `month`+`year` select a whole calendar month and cannot be combined with
/// `from`/`to`. `to` is inclusive on the wire.
pub(crate) fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ServerError> {
    match (month, year) {
        (Some(month), Some(year)) => {
            if from.is_some() || to.is_some() {
                return Err(ServerError::Generic(
                    "month/year cannot be combined with from/to".to_string(),
                ));
            }
            let start = first_of_month(year, month)?;
            let (next_year, next_month) = next_month(year, month);
            let end = first_of_month(next_year, next_month)?;
            Ok((Some(start), Some(end)))
        }
        (None, None) => {
            let to = match to {
                Some(to) => Some(to.succ_opt().ok_or_else(|| {
                    ServerError::Generic("date range end out of range".to_string())
                })?),
                None => None,
            };
            Ok((from, to))
        }
        _ => Err(ServerError::Generic(
            "month and year must be given together".to_string(),
        )),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(50).min(200);
    let (from, to) = resolve_range(query.from, query.to, query.month, query.year)?;
    let filter = TransactionListFilter {
        from,
        to,
        kind: query.kind.map(map_kind_in),
        category_id: query.category_id,
    };

    let (rows, next_cursor) = state
        .engine
        .list_transactions_page(limit, query.cursor.as_deref(), &filter)
        .await?;

    let transactions = rows
        .into_iter()
        .map(|(tx, category)| view(tx, &category))
        .collect();

    Ok(Json(TransactionListResponse {
        transactions,
        next_cursor,
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionCreate>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let (tx, category) = state
        .engine
        .create_transaction(engine::TransactionCreateCmd {
            kind: map_kind_in(payload.kind),
            category_id: payload.category_id,
            amount_minor: payload.amount_minor,
            transaction_date: payload.transaction_date,
            description: payload.description,
            payment_method: payload.payment_method,
            location: payload.location,
            tags: payload.tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(tx, &category))))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let (tx, category) = state.engine.transaction(id).await?;
    Ok(Json(view(tx, &category)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let (tx, category) = state
        .engine
        .update_transaction(engine::TransactionUpdateCmd {
            transaction_id: id,
            kind: payload.kind.map(map_kind_in),
            category_id: payload.category_id,
            amount_minor: payload.amount_minor,
            transaction_date: payload.transaction_date,
            description: payload.description,
            payment_method: payload.payment_method,
            location: payload.location,
            tags: payload.tags,
        })
        .await?;
    Ok(Json(view(tx, &category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
