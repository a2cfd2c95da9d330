pub use categories::{Category, OTHER_EXPENSE, OTHER_INCOME};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, TransactionListFilter};
pub use savings_goals::SavingsGoal;
pub use transactions::{Transaction, TransactionKind, canonical_payment_method};

pub mod analytics;
mod categories;
mod currency;
mod error;
mod ops;
mod savings_goals;
mod transactions;
mod util;

pub use ops::categories::CategoryCreateCmd;
pub use ops::goals::{GoalCreateCmd, GoalUpdateCmd};
pub use ops::transactions::{TransactionCreateCmd, TransactionUpdateCmd};

type ResultEngine<T> = Result<T, EngineError>;
