use chrono::Utc;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::util::{normalize_category_display, normalize_category_key};
use crate::{Category, EngineError, ResultEngine, categories};

use super::{Engine, normalize_optional_text, with_tx};

/// Fields accepted when creating a category.
#[derive(Clone, Debug, Default)]
pub struct CategoryCreateCmd {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_income: bool,
}

impl Engine {
    /// Lists categories, active ones only unless `include_inactive` is set.
    ///
    /// Sorted by name; an `is_income` filter narrows to one side of the
    /// ledger.
    pub async fn list_categories(
        &self,
        include_inactive: bool,
        is_income: Option<bool>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find().order_by_asc(categories::Column::Name);
            if !include_inactive {
                query = query.filter(categories::Column::IsActive.eq(true));
            }
            if let Some(is_income) = is_income {
                query = query.filter(categories::Column::IsIncome.eq(is_income));
            }
            let models = query.all(&db_tx).await?;
            Ok(models.into_iter().map(Category::from).collect())
        })
    }

    /// Creates a category.
    ///
    /// The name is normalized before storing; two names that normalize to the
    /// same key are rejected as duplicates.
    pub async fn create_category(&self, cmd: CategoryCreateCmd) -> ResultEngine<Category> {
        let display = normalize_category_display(&cmd.name)?;
        let name_norm = normalize_category_key(&display);
        let category = Category {
            id: Uuid::new_v4(),
            name: display,
            description: normalize_optional_text(cmd.description.as_deref()),
            color: normalize_optional_text(cmd.color.as_deref()),
            icon: normalize_optional_text(cmd.icon.as_deref()),
            is_income: cmd.is_income,
            is_active: true,
            created_at: Utc::now(),
        };
        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "category `{}` already exists",
                    category.name
                )));
            }
            category.to_active_model(name_norm.clone()).insert(&db_tx).await?;
            Ok(category.clone())
        })
    }

    /// Activates or deactivates a category. Deactivated categories keep their
    /// transactions but stop appearing in default lists.
    pub async fn set_category_active(&self, category_id: Uuid, active: bool) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            if model.is_active == active {
                Ok(Category::from(model))
            } else {
                let active_model = categories::ActiveModel {
                    id: ActiveValue::Set(category_id),
                    is_active: ActiveValue::Set(active),
                    ..Default::default()
                };
                let updated = active_model.update(&db_tx).await?;
                Ok(Category::from(updated))
            }
        })
    }

    /// Looks up a category by id within an open DB transaction.
    pub(super) async fn require_category(
        &self,
        db_tx: &DatabaseTransaction,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }
}
