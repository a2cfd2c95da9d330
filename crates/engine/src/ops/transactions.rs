use base64::Engine as _;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::transactions::MAX_TAGS;
use crate::{
    Category, Currency, EngineError, ResultEngine, Transaction, TransactionKind, categories,
    canonical_payment_method, transactions,
};

use super::{Engine, normalize_optional_text, with_tx};

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both calendar
/// dates.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::TransactionDate.lt(to));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    transaction_date: NaiveDate,
    transaction_id: Uuid,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

/// Fields accepted when recording a transaction.
#[derive(Clone, Debug)]
pub struct TransactionCreateCmd {
    pub kind: TransactionKind,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub transaction_date: NaiveDate,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update: `None` keeps the stored value.
///
/// Optional text fields use an outer `Option` for "touch or not" and the
/// normalized value itself may still end up empty, which clears the field.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdateCmd {
    pub transaction_id: Uuid,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    pub amount_minor: Option<i64>,
    pub transaction_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn normalize_tags(tags: Vec<String>) -> ResultEngine<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(tag) = normalize_optional_text(Some(&tag)) {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
    }
    if out.len() > MAX_TAGS {
        return Err(EngineError::InvalidName(format!(
            "at most {MAX_TAGS} tags per transaction"
        )));
    }
    Ok(out)
}

fn ensure_kind_agreement(category: &categories::Model, kind: TransactionKind) -> ResultEngine<()> {
    if category.is_income != kind.is_income() {
        return Err(EngineError::KindMismatch(format!(
            "category `{}` does not apply to {} transactions",
            category.name,
            kind.as_str()
        )));
    }
    Ok(())
}

fn apply_optional_text_patch(existing: Option<String>, patch: Option<&str>) -> Option<String> {
    match patch {
        None => existing,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

impl Engine {
    async fn require_active_category(
        &self,
        db_tx: &DatabaseTransaction,
        category_id: Uuid,
        kind: TransactionKind,
    ) -> ResultEngine<categories::Model> {
        let category = self.require_category(db_tx, category_id).await?;
        if !category.is_active {
            return Err(EngineError::InvalidName(format!(
                "category `{}` is inactive",
                category.name
            )));
        }
        ensure_kind_agreement(&category, kind)?;
        Ok(category)
    }

    /// Records a transaction against an active category of the matching kind.
    pub async fn create_transaction(
        &self,
        cmd: TransactionCreateCmd,
    ) -> ResultEngine<(Transaction, Category)> {
        let tags = normalize_tags(cmd.tags)?;
        let payment_method = cmd
            .payment_method
            .as_deref()
            .and_then(|m| normalize_optional_text(Some(m)))
            .map(|m| canonical_payment_method(&m));
        let tx = Transaction::new(
            cmd.kind,
            cmd.category_id,
            cmd.amount_minor,
            Currency::Php,
            cmd.transaction_date,
            normalize_optional_text(cmd.description.as_deref()),
            payment_method,
            normalize_optional_text(cmd.location.as_deref()),
            tags,
        )?;
        with_tx!(self, |db_tx| {
            let category = self
                .require_active_category(&db_tx, cmd.category_id, cmd.kind)
                .await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok((tx.clone(), Category::from(category)))
        })
    }

    /// Returns a single transaction with its category.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<(Transaction, Category)> {
        with_tx!(self, |db_tx| {
            let (tx_model, category_model) = transactions::Entity::find_by_id(transaction_id)
                .find_also_related(categories::Entity)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            let category_model = category_model
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            Ok((Transaction::try_from(tx_model)?, Category::from(category_model)))
        })
    }

    /// Updates an existing transaction.
    ///
    /// When the category changes (or the stored one is rechecked), the
    /// category must still be active and agree with the transaction kind.
    pub async fn update_transaction(
        &self,
        cmd: TransactionUpdateCmd,
    ) -> ResultEngine<(Transaction, Category)> {
        let tags = cmd.tags.map(normalize_tags).transpose()?;
        with_tx!(self, |db_tx| {
            let tx_model = transactions::Entity::find_by_id(cmd.transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            let mut tx = Transaction::try_from(tx_model)?;

            if let Some(amount_minor) = cmd.amount_minor {
                if amount_minor <= 0 {
                    return Err(EngineError::InvalidAmount(
                        "amount_minor must be > 0".to_string(),
                    ));
                }
                tx.amount_minor = amount_minor;
            }
            if let Some(date) = cmd.transaction_date {
                tx.transaction_date = date;
            }
            if let Some(kind) = cmd.kind {
                tx.kind = kind;
            }
            if let Some(category_id) = cmd.category_id {
                tx.category_id = category_id;
            }
            tx.description = apply_optional_text_patch(tx.description, cmd.description.as_deref());
            tx.location = apply_optional_text_patch(tx.location, cmd.location.as_deref());
            tx.payment_method =
                apply_optional_text_patch(tx.payment_method, cmd.payment_method.as_deref())
                    .map(|m| canonical_payment_method(&m));
            if let Some(tags) = tags {
                tx.tags = tags;
            }
            tx.updated_at = Utc::now();

            let category = self
                .require_active_category(&db_tx, tx.category_id, tx.kind)
                .await?;

            let mut active = transactions::ActiveModel::from(&tx);
            active.created_at = ActiveValue::NotSet;
            active.update(&db_tx).await?;
            Ok((tx.clone(), Category::from(category)))
        })
    }

    /// Removes a transaction. Deletes are hard; there is no recycle bin.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "transaction not exists".to_string(),
                ));
            }
            Ok(())
        })
    }

    /// Lists recent transactions with their categories, with cursor-based
    /// pagination.
    ///
    /// Pagination is newest → older by `(transaction_date DESC, id DESC)`.
    pub async fn list_transactions_page(
        &self,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<(Vec<(Transaction, Category)>, Option<String>)> {
        with_tx!(self, |db_tx| {
            validate_list_filter(filter)?;

            let limit_plus_one = limit.saturating_add(1);
            let mut query = transactions::Entity::find()
                .find_also_related(categories::Entity)
                .order_by_desc(transactions::Column::TransactionDate)
                .order_by_desc(transactions::Column::Id)
                .limit(limit_plus_one);

            if let Some(cursor) = cursor {
                let cursor = TransactionsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::TransactionDate.lt(cursor.transaction_date))
                        .add(
                            Condition::all()
                                .add(
                                    transactions::Column::TransactionDate
                                        .eq(cursor.transaction_date),
                                )
                                .add(transactions::Column::Id.lt(cursor.transaction_id)),
                        ),
                );
            }
            query = query.apply_tx_filters(filter);

            let rows: Vec<(transactions::Model, Option<categories::Model>)> =
                query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let mut out: Vec<(Transaction, Category)> =
                Vec::with_capacity(rows.len().min(limit as usize));
            for (tx_model, category_model) in rows.into_iter().take(limit as usize) {
                let category_model = category_model
                    .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
                out.push((Transaction::try_from(tx_model)?, Category::from(category_model)));
            }

            let next_cursor = out.last().map(|(tx, _)| TransactionsCursor {
                transaction_date: tx.transaction_date,
                transaction_id: tx.id,
            });
            let next_cursor = if has_more {
                next_cursor.map(|c| c.encode()).transpose()?
            } else {
                None
            };

            Ok((out, next_cursor))
        })
    }

    /// Loads every transaction matching the filter, oldest first, with its
    /// category. Reporting reads go through this.
    pub async fn list_all_transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<(Transaction, Category)>> {
        with_tx!(self, |db_tx| {
            validate_list_filter(filter)?;

            let query = transactions::Entity::find()
                .find_also_related(categories::Entity)
                .order_by_asc(transactions::Column::TransactionDate)
                .order_by_asc(transactions::Column::Id)
                .apply_tx_filters(filter);

            let rows: Vec<(transactions::Model, Option<categories::Model>)> =
                query.all(&db_tx).await?;
            let mut out: Vec<(Transaction, Category)> = Vec::with_capacity(rows.len());
            for (tx_model, category_model) in rows {
                let category_model = category_model
                    .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
                out.push((Transaction::try_from(tx_model)?, Category::from(category_model)));
            }
            Ok(out)
        })
    }
}
