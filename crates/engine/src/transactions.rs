//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense record tied to a category,
//! with a positive amount in minor units and a calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn is_income(self) -> bool {
        matches!(self, Self::Income)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Canonical payment method labels, as shown in the transaction form.
pub const PAYMENT_METHODS: &[&str] = &[
    "Cash",
    "Credit Card",
    "Debit Card",
    "Bank Transfer",
    "GCash",
    "PayMaya",
    "GrabPay",
    "Other",
];

/// Maps common spellings onto the canonical payment method labels.
///
/// Unknown values pass through trimmed; the engine does not reject payment
/// methods it has never seen.
pub fn canonical_payment_method(value: &str) -> String {
    let trimmed = value.trim();
    let folded = trimmed.to_ascii_lowercase().replace('_', " ");
    for canonical in PAYMENT_METHODS {
        if canonical.to_ascii_lowercase() == folded {
            return (*canonical).to_string();
        }
    }
    trimmed.to_string()
}

/// Maximum number of tags accepted on a transaction.
pub const MAX_TAGS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub category_id: Uuid,
    /// Positive amount in minor units; the kind carries the sign.
    pub amount_minor: i64,
    pub currency: Currency,
    pub transaction_date: NaiveDate,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TransactionKind,
        category_id: Uuid,
        amount_minor: i64,
        currency: Currency,
        transaction_date: NaiveDate,
        description: Option<String>,
        payment_method: Option<String>,
        location: Option<String>,
        tags: Vec<String>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            category_id,
            amount_minor,
            currency,
            transaction_date,
            description,
            payment_method,
            location,
            tags,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub kind: String,
    pub amount_minor: i64,
    pub currency: String,
    pub transaction_date: Date,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    /// JSON array of strings.
    pub tags: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn encode_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        serde_json::to_string(tags).ok()
    }
}

/// Lenient on malformed rows: bad JSON reads back as no tags.
fn decode_tags(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            category_id: ActiveValue::Set(tx.category_id),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            transaction_date: ActiveValue::Set(tx.transaction_date),
            description: ActiveValue::Set(tx.description.clone()),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            location: ActiveValue::Set(tx.location.clone()),
            tags: ActiveValue::Set(encode_tags(&tx.tags)),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            transaction_date: model.transaction_date,
            description: model.description,
            payment_method: model.payment_method,
            location: model.location,
            tags: decode_tags(model.tags.as_deref()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_payment_method_maps_variants() {
        assert_eq!(canonical_payment_method("credit_card"), "Credit Card");
        assert_eq!(canonical_payment_method("credit card"), "Credit Card");
        assert_eq!(canonical_payment_method("GCASH"), "GCash");
        assert_eq!(canonical_payment_method("  cash "), "Cash");
    }

    #[test]
    fn canonical_payment_method_passes_unknown_through() {
        assert_eq!(canonical_payment_method("Barter"), "Barter");
    }

    #[test]
    fn tags_round_trip_and_tolerate_garbage() {
        let encoded = encode_tags(&["grocery".to_string(), "weekly".to_string()]);
        assert_eq!(decode_tags(encoded.as_deref()), vec!["grocery", "weekly"]);
        assert!(decode_tags(Some("not json")).is_empty());
        assert!(decode_tags(None).is_empty());
    }

    #[test]
    fn new_rejects_non_positive_amounts() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let err = Transaction::new(
            TransactionKind::Expense,
            Uuid::new_v4(),
            0,
            Currency::Php,
            date,
            None,
            None,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
