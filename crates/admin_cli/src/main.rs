use std::error::Error;

use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{Engine, TransactionKind};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "ipon_admin")]
#[command(about = "Admin utilities for Ipon (migrate, inspect categories, demo data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./ipon.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations (including the category seed).
    Migrate,
    Category(Category),
    /// Insert a small set of sample transactions for trying out the API.
    DemoData,
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List every category, active or not.
    List,
    Create(CategoryCreateArgs),
}

#[derive(Args, Debug)]
struct CategoryCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    income: bool,
    #[arg(long)]
    description: Option<String>,
    /// Hex color like `#22c55e`.
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    icon: Option<String>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

struct DemoRow {
    days_ago: i64,
    kind: TransactionKind,
    category: &'static str,
    amount_minor: i64,
    description: &'static str,
    payment_method: Option<&'static str>,
}

const DEMO_ROWS: &[DemoRow] = &[
    DemoRow {
        days_ago: 45,
        kind: TransactionKind::Income,
        category: "Salary",
        amount_minor: 3_500_000,
        description: "Monthly salary",
        payment_method: Some("Bank Transfer"),
    },
    DemoRow {
        days_ago: 44,
        kind: TransactionKind::Expense,
        category: "Housing",
        amount_minor: 1_200_000,
        description: "Apartment rent",
        payment_method: Some("Bank Transfer"),
    },
    DemoRow {
        days_ago: 40,
        kind: TransactionKind::Expense,
        category: "Groceries",
        amount_minor: 325_050,
        description: "Weekly palengke run",
        payment_method: Some("Cash"),
    },
    DemoRow {
        days_ago: 33,
        kind: TransactionKind::Expense,
        category: "Transportation",
        amount_minor: 12_000,
        description: "Jeepney and tricycle fares",
        payment_method: Some("Cash"),
    },
    DemoRow {
        days_ago: 15,
        kind: TransactionKind::Income,
        category: "Salary",
        amount_minor: 3_500_000,
        description: "Monthly salary",
        payment_method: Some("Bank Transfer"),
    },
    DemoRow {
        days_ago: 12,
        kind: TransactionKind::Expense,
        category: "Utilities",
        amount_minor: 245_000,
        description: "Electric bill",
        payment_method: Some("GCash"),
    },
    DemoRow {
        days_ago: 7,
        kind: TransactionKind::Expense,
        category: "Dining Out",
        amount_minor: 85_000,
        description: "Family dinner",
        payment_method: Some("GCash"),
    },
    DemoRow {
        days_ago: 2,
        kind: TransactionKind::Expense,
        category: "Groceries",
        amount_minor: 298_500,
        description: "Weekly palengke run",
        payment_method: Some("Cash"),
    },
];

async fn insert_demo_data(engine: &Engine) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let categories = engine.list_categories(false, None).await?;
    let today = Utc::now().date_naive();

    let mut inserted = 0;
    for row in DEMO_ROWS {
        let Some(category) = categories.iter().find(|c| c.name == row.category) else {
            eprintln!("skipping row: category not found: {}", row.category);
            continue;
        };
        engine
            .create_transaction(engine::TransactionCreateCmd {
                kind: row.kind,
                category_id: category.id,
                amount_minor: row.amount_minor,
                transaction_date: today - Duration::days(row.days_ago),
                description: Some(row.description.to_string()),
                payment_method: row.payment_method.map(str::to_string),
                location: None,
                tags: vec!["demo".to_string()],
            })
            .await?;
        inserted += 1;
    }

    Ok(inserted)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            // connect_db already ran the migrator.
            println!("database is up to date");
        }
        Command::Category(Category {
            command: CategoryCommand::List,
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            for category in engine.list_categories(true, None).await? {
                let side = if category.is_income { "income" } else { "expense" };
                let state = if category.is_active { "" } else { " (inactive)" };
                println!("{} {side:7} {}{state}", category.id, category.name);
            }
        }
        Command::Category(Category {
            command: CategoryCommand::Create(args),
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            let category = engine
                .create_category(engine::CategoryCreateCmd {
                    name: args.name,
                    description: args.description,
                    color: args.color,
                    icon: args.icon,
                    is_income: args.income,
                })
                .await?;
            println!("created category: {} ({})", category.name, category.id);
        }
        Command::DemoData => {
            let engine = Engine::builder().database(db).build().await?;
            let inserted = insert_demo_data(&engine).await?;
            println!("inserted {inserted} demo transactions");
        }
    }

    Ok(())
}
