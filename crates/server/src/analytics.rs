//! Reporting API endpoints.
//!
//! Each endpoint loads the relevant transaction records once and runs the
//! pure reducers from `engine::analytics` over them.

use api_types::analytics::{
    CategoryTotal, CategoryTotalsQuery, CategoryTotalsResponse, DailyPoint, DailyQuery,
    DailyResponse, MonthlyPoint, MonthlyQuery, MonthlyResponse, PaymentMethodTotal,
    PaymentMethodsResponse, SummaryQuery, SummaryResponse, WeekdayTotal, WeekdaysResponse,
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Utc};

use crate::{ServerError, server::ServerState};
use engine::TransactionListFilter;
use engine::analytics::{
    self, TxRecord, WEEKDAYS, average_expense, category_totals, financial_summary, growth_rate,
    monthly_summary, payment_method_totals, savings_rate, weekday_totals,
};

const DEFAULT_MONTHS: usize = 6;
const DEFAULT_CATEGORY_LIMIT: usize = 8;

fn current_year_month() -> (i32, u32) {
    let today = Utc::now().date_naive();
    (today.year(), today.month())
}

fn resolve_month(year: Option<i32>, month: Option<u32>) -> Result<(i32, u32), ServerError> {
    match (year, month) {
        (Some(year), Some(month)) if (1..=12).contains(&month) => Ok((year, month)),
        (Some(_), Some(month)) => Err(ServerError::Generic(format!("invalid month: {month}"))),
        (None, None) => Ok(current_year_month()),
        _ => Err(ServerError::Generic(
            "year and month must be given together".to_string(),
        )),
    }
}

fn in_month(record: &TxRecord, year: i32, month: u32) -> bool {
    record.date.year() == year && record.date.month() == month
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Dashboard stats for one calendar month (default: the current one).
///
/// The growth rate compares the month's expenses against the previous
/// calendar month.
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let (year, month) = resolve_month(query.year, query.month)?;
    let records = state
        .engine
        .transaction_records(&TransactionListFilter::default())
        .await?;

    let month_records: Vec<TxRecord> = records
        .iter()
        .filter(|r| in_month(r, year, month))
        .cloned()
        .collect();
    let summary = financial_summary(&month_records);

    let months = monthly_summary(&records);
    let expenses_of = |y: i32, m: u32| {
        months
            .iter()
            .find(|entry| entry.year == y && entry.month == m)
            .map(|entry| entry.expenses_minor)
            .unwrap_or(0)
    };
    let (prev_year, prev_month) = previous_month(year, month);
    let expense_growth_rate = growth_rate(
        expenses_of(prev_year, prev_month),
        expenses_of(year, month),
    );

    Ok(Json(SummaryResponse {
        currency: api_types::Currency::Php,
        total_income_minor: summary.total_income_minor,
        total_expenses_minor: summary.total_expenses_minor,
        net_minor: summary.net_minor,
        income_count: summary.income_count,
        expense_count: summary.expense_count,
        savings_rate: savings_rate(&summary),
        average_expense_minor: average_expense(&summary),
        expense_growth_rate,
    }))
}

/// Month-by-month income and expense totals, ascending. Months without
/// transactions do not appear.
pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyResponse>, ServerError> {
    let records = state
        .engine
        .transaction_records(&TransactionListFilter::default())
        .await?;
    let mut months = monthly_summary(&records);

    let keep = query.months.unwrap_or(DEFAULT_MONTHS);
    if months.len() > keep {
        months.drain(..months.len() - keep);
    }

    Ok(Json(MonthlyResponse {
        months: months
            .into_iter()
            .map(|m| MonthlyPoint {
                year: m.year,
                month: m.month,
                income_minor: m.income_minor,
                expenses_minor: m.expenses_minor,
                net_minor: m.net_minor,
            })
            .collect(),
    }))
}

/// Expense totals per category, largest first.
pub async fn categories(
    State(state): State<ServerState>,
    Query(query): Query<CategoryTotalsQuery>,
) -> Result<Json<CategoryTotalsResponse>, ServerError> {
    let records = state
        .engine
        .transaction_records(&TransactionListFilter::default())
        .await?;
    let mut ranked = category_totals(&records);
    let total_expenses_minor = ranked.iter().map(|(_, total)| total).sum();
    ranked.truncate(query.limit.unwrap_or(DEFAULT_CATEGORY_LIMIT));

    Ok(Json(CategoryTotalsResponse {
        categories: ranked
            .into_iter()
            .map(|(name, total_minor)| CategoryTotal { name, total_minor })
            .collect(),
        total_expenses_minor,
    }))
}

/// Expense totals per weekday, Sunday first.
pub async fn weekdays(
    State(state): State<ServerState>,
) -> Result<Json<WeekdaysResponse>, ServerError> {
    let records = state
        .engine
        .transaction_records(&TransactionListFilter::default())
        .await?;
    let totals = weekday_totals(&records);

    Ok(Json(WeekdaysResponse {
        days: WEEKDAYS
            .iter()
            .zip(totals)
            .map(|(weekday, total_minor)| WeekdayTotal {
                weekday: (*weekday).to_string(),
                total_minor,
            })
            .collect(),
    }))
}

/// Expense totals per payment method, largest first.
pub async fn payment_methods(
    State(state): State<ServerState>,
) -> Result<Json<PaymentMethodsResponse>, ServerError> {
    let records = state
        .engine
        .transaction_records(&TransactionListFilter::default())
        .await?;
    let ranked = payment_method_totals(&records);

    Ok(Json(PaymentMethodsResponse {
        methods: ranked
            .into_iter()
            .map(|(method, total_minor)| PaymentMethodTotal {
                method,
                total_minor,
            })
            .collect(),
    }))
}

/// Cumulative spending per day of one month (default: the current one).
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyResponse>, ServerError> {
    let (year, month) = resolve_month(query.year, query.month)?;
    let records = state
        .engine
        .transaction_records(&TransactionListFilter::default())
        .await?;

    let days = analytics::daily_cumulative(&records, year, month)
        .into_iter()
        .map(|(day, cumulative_minor)| DailyPoint {
            day,
            cumulative_minor,
        })
        .collect();

    Ok(Json(DailyResponse { year, month, days }))
}
