use chrono::NaiveDate;
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Category, Engine, EngineError, TransactionCreateCmd, TransactionKind, TransactionListFilter,
    TransactionUpdateCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn category_named(engine: &Engine, name: &str) -> Category {
    engine
        .list_categories(true, None)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("seeded category {name} missing"))
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn expense_cmd(category_id: Uuid, amount_minor: i64, on: &str) -> TransactionCreateCmd {
    TransactionCreateCmd {
        kind: TransactionKind::Expense,
        category_id,
        amount_minor,
        transaction_date: date(on),
        description: None,
        payment_method: None,
        location: None,
        tags: Vec::new(),
    }
}

#[tokio::test]
async fn seeded_categories_cover_both_sides() {
    let engine = engine_with_db().await;

    let categories = engine.list_categories(false, None).await.unwrap();
    assert!(categories.iter().any(|c| c.name == "Groceries" && !c.is_income));
    assert!(categories.iter().any(|c| c.name == "Salary" && c.is_income));
    assert!(categories.iter().any(|c| c.name == "Other"));
    assert!(categories.iter().any(|c| c.name == "Other Income"));

    let income_only = engine.list_categories(false, Some(true)).await.unwrap();
    assert!(income_only.iter().all(|c| c.is_income));
}

#[tokio::test]
async fn create_and_fetch_transaction() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;

    let (created, category) = engine
        .create_transaction(TransactionCreateCmd {
            kind: TransactionKind::Expense,
            category_id: groceries.id,
            amount_minor: 45_050,
            transaction_date: date("2026-02-14"),
            description: Some("  weekly palengke run ".to_string()),
            payment_method: Some("gcash".to_string()),
            location: Some("Quezon City".to_string()),
            tags: vec!["grocery".to_string(), "weekly".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(category.id, groceries.id);
    assert_eq!(created.description.as_deref(), Some("weekly palengke run"));
    assert_eq!(created.payment_method.as_deref(), Some("GCash"));

    let (fetched, fetched_category) = engine.transaction(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched_category.name, "Groceries");
}

#[tokio::test]
async fn create_rejects_kind_mismatch() {
    let engine = engine_with_db().await;
    let salary = category_named(&engine, "Salary").await;

    let err = engine
        .create_transaction(expense_cmd(salary.id, 1_000, "2026-02-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KindMismatch(_)));
}

#[tokio::test]
async fn create_rejects_unknown_and_inactive_categories() {
    let engine = engine_with_db().await;

    let err = engine
        .create_transaction(expense_cmd(Uuid::new_v4(), 1_000, "2026-02-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let shopping = category_named(&engine, "Shopping").await;
    engine
        .set_category_active(shopping.id, false)
        .await
        .unwrap();
    let err = engine
        .create_transaction(expense_cmd(shopping.id, 1_000, "2026-02-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let engine = engine_with_db().await;

    let err = engine
        .create_category(engine::CategoryCreateCmd {
            name: " groceries ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let created = engine
        .create_category(engine::CategoryCreateCmd {
            name: "Pets".to_string(),
            color: Some("#f472b6".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(created.is_active);
    assert!(!created.is_income);
}

#[tokio::test]
async fn update_patches_only_given_fields() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;
    let dining = category_named(&engine, "Dining Out").await;

    let (created, _) = engine
        .create_transaction(expense_cmd(groceries.id, 10_000, "2026-02-10"))
        .await
        .unwrap();

    let (updated, category) = engine
        .update_transaction(TransactionUpdateCmd {
            transaction_id: created.id,
            category_id: Some(dining.id),
            amount_minor: Some(12_500),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.amount_minor, 12_500);
    assert_eq!(updated.category_id, dining.id);
    assert_eq!(updated.transaction_date, created.transaction_date);
    assert_eq!(category.name, "Dining Out");

    let err = engine
        .update_transaction(TransactionUpdateCmd {
            transaction_id: created.id,
            amount_minor: Some(0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn update_revalidates_kind_against_category() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;
    let salary = category_named(&engine, "Salary").await;

    let (created, _) = engine
        .create_transaction(expense_cmd(groceries.id, 5_000, "2026-02-01"))
        .await
        .unwrap();

    // Flipping the kind while keeping an expense category must fail.
    let err = engine
        .update_transaction(TransactionUpdateCmd {
            transaction_id: created.id,
            kind: Some(TransactionKind::Income),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KindMismatch(_)));

    // Moving kind and category together is fine.
    let (updated, category) = engine
        .update_transaction(TransactionUpdateCmd {
            transaction_id: created.id,
            kind: Some(TransactionKind::Income),
            category_id: Some(salary.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.kind, TransactionKind::Income);
    assert_eq!(category.name, "Salary");
}

#[tokio::test]
async fn delete_is_hard_and_idempotent_errors() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;

    let (created, _) = engine
        .create_transaction(expense_cmd(groceries.id, 5_000, "2026-02-03"))
        .await
        .unwrap();

    engine.delete_transaction(created.id).await.unwrap();
    let err = engine.delete_transaction(created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.transaction(created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn list_pages_newest_first_with_cursor() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;

    for (amount, on) in [(1_000, "2026-02-01"), (2_000, "2026-02-02"), (3_000, "2026-02-03")] {
        engine
            .create_transaction(expense_cmd(groceries.id, amount, on))
            .await
            .unwrap();
    }

    let filter = TransactionListFilter::default();
    let (first_page, next) = engine.list_transactions_page(2, None, &filter).await.unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].0.transaction_date, date("2026-02-03"));
    assert_eq!(first_page[1].0.transaction_date, date("2026-02-02"));
    let cursor = next.expect("expected another page");

    let (second_page, next) = engine
        .list_transactions_page(2, Some(&cursor), &filter)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].0.transaction_date, date("2026-02-01"));
    assert!(next.is_none());

    let err = engine
        .list_transactions_page(2, Some("not a cursor"), &filter)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCursor(_)));
}

#[tokio::test]
async fn list_filters_by_kind_category_and_range() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;
    let dining = category_named(&engine, "Dining Out").await;
    let salary = category_named(&engine, "Salary").await;

    engine
        .create_transaction(expense_cmd(groceries.id, 1_000, "2026-01-15"))
        .await
        .unwrap();
    engine
        .create_transaction(expense_cmd(dining.id, 2_000, "2026-02-15"))
        .await
        .unwrap();
    engine
        .create_transaction(TransactionCreateCmd {
            kind: TransactionKind::Income,
            category_id: salary.id,
            amount_minor: 100_000,
            transaction_date: date("2026-02-28"),
            description: None,
            payment_method: None,
            location: None,
            tags: Vec::new(),
        })
        .await
        .unwrap();

    let income_only = TransactionListFilter {
        kind: Some(TransactionKind::Income),
        ..Default::default()
    };
    let (rows, _) = engine.list_transactions_page(10, None, &income_only).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1.name, "Salary");

    let february = TransactionListFilter {
        from: Some(date("2026-02-01")),
        to: Some(date("2026-03-01")),
        ..Default::default()
    };
    let (rows, _) = engine.list_transactions_page(10, None, &february).await.unwrap();
    assert_eq!(rows.len(), 2);

    let dining_only = TransactionListFilter {
        category_id: Some(dining.id),
        ..Default::default()
    };
    let (rows, _) = engine.list_transactions_page(10, None, &dining_only).await.unwrap();
    assert_eq!(rows.len(), 1);

    let backwards = TransactionListFilter {
        from: Some(date("2026-03-01")),
        to: Some(date("2026-02-01")),
        ..Default::default()
    };
    let err = engine
        .list_transactions_page(10, None, &backwards)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn records_feed_the_reporting_reducers() {
    let engine = engine_with_db().await;
    let groceries = category_named(&engine, "Groceries").await;
    let salary = category_named(&engine, "Salary").await;

    engine
        .create_transaction(TransactionCreateCmd {
            kind: TransactionKind::Income,
            category_id: salary.id,
            amount_minor: 50_000,
            transaction_date: date("2026-01-05"),
            description: None,
            payment_method: None,
            location: None,
            tags: Vec::new(),
        })
        .await
        .unwrap();
    engine
        .create_transaction(expense_cmd(groceries.id, 20_000, "2026-03-10"))
        .await
        .unwrap();

    let records = engine
        .transaction_records(&TransactionListFilter::default())
        .await
        .unwrap();
    let summary = engine::analytics::financial_summary(&records);
    assert_eq!(summary.net_minor, 30_000);

    let months = engine::analytics::monthly_summary(&records);
    assert_eq!(months.len(), 2);
    assert_eq!((months[0].year, months[0].month), (2026, 1));
    assert_eq!((months[1].year, months[1].month), (2026, 3));
}
