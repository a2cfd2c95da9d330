//! Seeds the default category set.
//!
//! The app ships with a fixed starter set on both sides of the ledger,
//! including the `Other` / `Other Income` fallbacks the assistant leans on
//! when it cannot match a suggestion. Seeding is idempotent: a category
//! whose normalized name already exists is left alone.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use sea_orm_migration::{SchemaManagerConnection, prelude::*};
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

struct SeedCategory {
    name: &'static str,
    color: &'static str,
    icon: &'static str,
    is_income: bool,
}

const fn expense(name: &'static str, color: &'static str, icon: &'static str) -> SeedCategory {
    SeedCategory {
        name,
        color,
        icon,
        is_income: false,
    }
}

const fn income(name: &'static str, color: &'static str, icon: &'static str) -> SeedCategory {
    SeedCategory {
        name,
        color,
        icon,
        is_income: true,
    }
}

const SEED_CATEGORIES: &[SeedCategory] = &[
    expense("Groceries", "#22c55e", "shopping-cart"),
    expense("Transportation", "#3b82f6", "bus"),
    expense("Utilities", "#eab308", "zap"),
    expense("Housing", "#8b5cf6", "home"),
    expense("Dining Out", "#f97316", "utensils"),
    expense("Entertainment", "#ec4899", "clapperboard"),
    expense("Healthcare", "#ef4444", "heart-pulse"),
    expense("Education", "#06b6d4", "graduation-cap"),
    expense("Shopping", "#a855f7", "shopping-bag"),
    expense("Other", "#6b7280", "circle-ellipsis"),
    income("Salary", "#16a34a", "banknote"),
    income("Business", "#0ea5e9", "briefcase"),
    income("Investments", "#14b8a6", "trending-up"),
    income("Allowance", "#f59e0b", "hand-coins"),
    income("Other Income", "#6b7280", "circle-plus"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        for category in SEED_CATEGORIES {
            insert_category(db, backend, category).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        for category in SEED_CATEGORIES {
            db.execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM categories WHERE name_norm = ?;",
                vec![category.name.to_lowercase().into()],
            ))
            .await?;
        }

        Ok(())
    }
}

async fn insert_category(
    db: &SchemaManagerConnection<'_>,
    backend: DbBackend,
    category: &SeedCategory,
) -> Result<(), DbErr> {
    let values = vec![
        Uuid::new_v4().as_bytes().to_vec().into(),
        category.name.to_string().into(),
        category.name.to_lowercase().into(),
        category.color.to_string().into(),
        category.icon.to_string().into(),
        category.is_income.into(),
        true.into(),
        Utc::now().into(),
        category.name.to_lowercase().into(),
    ];
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO categories (id, name, name_norm, color, icon, is_income, is_active, created_at) \
         SELECT ?, ?, ?, ?, ?, ?, ?, ? \
         WHERE NOT EXISTS (SELECT 1 FROM categories WHERE name_norm = ?);",
        values,
    ))
    .await?;
    Ok(())
}
