//! Pure aggregation over transaction records.
//!
//! Every function here is a deterministic reduction over an in-memory slice
//! of [`TxRecord`]s; nothing touches the database. The server loads the
//! household's transactions once and feeds them to whichever reducers the
//! requested view needs.
//!
//! Ordering rules worth knowing:
//!
//! - Ranked outputs ([`category_totals`], [`payment_method_totals`]) break
//!   ties by the first occurrence of the key in the input slice.
//! - [`monthly_summary`] omits months with no transactions; it never
//!   zero-fills gaps.
//! - [`growth_rate`] from a zero baseline is 100% when the new value is
//!   positive and 0% otherwise.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::TransactionKind;

/// The facts a reducer needs about one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRecord {
    pub kind: TransactionKind,
    /// Positive amount in minor units; the kind carries the sign.
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub category: String,
    pub payment_method: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FinancialSummary {
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
    pub net_minor: i64,
    pub income_count: u64,
    pub expense_count: u64,
}

/// Totals and counts per kind, in one pass.
pub fn financial_summary(records: &[TxRecord]) -> FinancialSummary {
    let mut summary = FinancialSummary::default();
    for record in records {
        match record.kind {
            TransactionKind::Income => {
                summary.total_income_minor += record.amount_minor;
                summary.income_count += 1;
            }
            TransactionKind::Expense => {
                summary.total_expenses_minor += record.amount_minor;
                summary.expense_count += 1;
            }
        }
    }
    summary.net_minor = summary.total_income_minor - summary.total_expenses_minor;
    summary
}

/// Expense totals per category, ranked descending.
///
/// Ties keep the insertion order of the category's first occurrence in
/// `records` (the sort is stable over first-seen order).
pub fn category_totals(records: &[TxRecord]) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, i64> = HashMap::new();
    for record in records {
        if record.kind != TransactionKind::Expense {
            continue;
        }
        let entry = totals.entry(record.category.clone()).or_insert_with(|| {
            order.push(record.category.clone());
            0
        });
        *entry += record.amount_minor;
    }

    let mut ranked: Vec<(String, i64)> = order
        .into_iter()
        .map(|name| {
            let total = totals.get(&name).copied().unwrap_or(0);
            (name, total)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// The `limit` largest expense categories.
pub fn top_categories(records: &[TxRecord], limit: usize) -> Vec<(String, i64)> {
    let mut ranked = category_totals(records);
    ranked.truncate(limit);
    ranked
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub income_minor: i64,
    pub expenses_minor: i64,
    pub net_minor: i64,
}

/// Per-calendar-month totals, ascending by (year, month).
///
/// Months with no transactions are omitted rather than zero-filled.
pub fn monthly_summary(records: &[TxRecord]) -> Vec<MonthSummary> {
    let mut buckets: HashMap<(i32, u32), (i64, i64)> = HashMap::new();
    for record in records {
        let key = (record.date.year(), record.date.month());
        let bucket = buckets.entry(key).or_insert((0, 0));
        match record.kind {
            TransactionKind::Income => bucket.0 += record.amount_minor,
            TransactionKind::Expense => bucket.1 += record.amount_minor,
        }
    }

    let mut months: Vec<MonthSummary> = buckets
        .into_iter()
        .map(|((year, month), (income, expenses))| MonthSummary {
            year,
            month,
            income_minor: income,
            expenses_minor: expenses,
            net_minor: income - expenses,
        })
        .collect();
    months.sort_by_key(|m| (m.year, m.month));
    months
}

/// Weekday labels, Sunday-first.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Expense totals bucketed by weekday, Sunday-first.
pub fn weekday_totals(records: &[TxRecord]) -> [i64; 7] {
    let mut totals = [0i64; 7];
    for record in records {
        if record.kind != TransactionKind::Expense {
            continue;
        }
        let idx = record.date.weekday().num_days_from_sunday() as usize;
        totals[idx] += record.amount_minor;
    }
    totals
}

/// Expense totals per payment method, ranked descending.
///
/// Records without a payment method are skipped. Ties keep first-occurrence
/// order, as in [`category_totals`].
pub fn payment_method_totals(records: &[TxRecord]) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, i64> = HashMap::new();
    for record in records {
        if record.kind != TransactionKind::Expense {
            continue;
        }
        let Some(method) = &record.payment_method else {
            continue;
        };
        let entry = totals.entry(method.clone()).or_insert_with(|| {
            order.push(method.clone());
            0
        });
        *entry += record.amount_minor;
    }

    let mut ranked: Vec<(String, i64)> = order
        .into_iter()
        .map(|method| {
            let total = totals.get(&method).copied().unwrap_or(0);
            (method, total)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1);
    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

/// Running expense total per day of the given month, one entry per day
/// `1..=days_in_month`. Days without spending repeat the previous total.
pub fn daily_cumulative(records: &[TxRecord], year: i32, month: u32) -> Vec<(u32, i64)> {
    let days = days_in_month(year, month);
    let mut per_day = vec![0i64; days as usize];
    for record in records {
        if record.kind != TransactionKind::Expense {
            continue;
        }
        if record.date.year() != year || record.date.month() != month {
            continue;
        }
        per_day[record.date.day() as usize - 1] += record.amount_minor;
    }

    let mut running = 0i64;
    per_day
        .into_iter()
        .enumerate()
        .map(|(idx, amount)| {
            running += amount;
            (idx as u32 + 1, running)
        })
        .collect()
}

/// Net over income, in percent. Zero income yields 0.
pub fn savings_rate(summary: &FinancialSummary) -> f64 {
    if summary.total_income_minor == 0 {
        return 0.0;
    }
    summary.net_minor as f64 / summary.total_income_minor as f64 * 100.0
}

/// Mean expense amount in minor units, rounded to nearest. Zero on empty.
pub fn average_expense(summary: &FinancialSummary) -> i64 {
    if summary.expense_count == 0 {
        return 0;
    }
    let count = summary.expense_count as i64;
    (summary.total_expenses_minor + count / 2) / count
}

/// Percent change from `previous` to `current`.
///
/// A zero baseline is defined as 100% growth when `current` is positive and
/// 0% otherwise.
pub fn growth_rate(previous: i64, current: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    (current - previous) as f64 / previous as f64 * 100.0
}
