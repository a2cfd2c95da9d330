//! Category primitives.
//!
//! A category classifies transactions and is flagged as either
//! income-applicable or expense-applicable. Lookups go through a
//! normalized name (`name_norm`) so "Dining  Out" and "dining out"
//! resolve to the same row.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback category names used when an assistant answer cannot be matched.
pub const OTHER_EXPENSE: &str = "Other";
pub const OTHER_INCOME: &str = "Other Income";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_income: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Normalized form used for duplicate detection.
    pub name_norm: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_income: bool,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            color: model.color,
            icon: model.icon,
            is_income: model.is_income,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl Category {
    pub(crate) fn to_active_model(&self, name_norm: String) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id),
            name: ActiveValue::Set(self.name.clone()),
            name_norm: ActiveValue::Set(name_norm),
            description: ActiveValue::Set(self.description.clone()),
            color: ActiveValue::Set(self.color.clone()),
            icon: ActiveValue::Set(self.icon.clone()),
            is_income: ActiveValue::Set(self.is_income),
            is_active: ActiveValue::Set(self.is_active),
            created_at: ActiveValue::Set(self.created_at),
        }
    }
}
