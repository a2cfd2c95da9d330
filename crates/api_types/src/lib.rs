use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Php,
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Query parameters for `GET /transactions`.
    ///
    /// `from`/`to` form an inclusive date range. `month` + `year` select a
    /// whole calendar month and are mutually exclusive with `from`/`to`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
        pub kind: Option<TransactionKind>,
        pub category_id: Option<Uuid>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub month: Option<u32>,
        pub year: Option<i32>,
    }

    /// A category embedded in a transaction response, enough for a client
    /// to label and colour the row without a second fetch.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub id: Uuid,
        pub name: String,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub is_income: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        /// Amount in minor units (centavos), always positive.
        pub amount_minor: i64,
        pub transaction_date: NaiveDate,
        pub description: Option<String>,
        pub payment_method: Option<String>,
        pub location: Option<String>,
        pub tags: Vec<String>,
        pub category: CategoryRef,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreate {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category_id: Uuid,
        pub transaction_date: NaiveDate,
        pub description: Option<String>,
        pub payment_method: Option<String>,
        pub location: Option<String>,
        #[serde(default)]
        pub tags: Vec<String>,
    }

    /// Partial update: absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub category_id: Option<Uuid>,
        pub transaction_date: Option<NaiveDate>,
        pub description: Option<String>,
        pub payment_method: Option<String>,
        pub location: Option<String>,
        pub tags: Option<Vec<String>>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub include_inactive: Option<bool>,
        pub is_income: Option<bool>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub is_income: bool,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        pub is_income: bool,
        pub description: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub target_amount_minor: i64,
        pub current_amount_minor: i64,
        pub target_date: Option<NaiveDate>,
        /// 1 = high, 2 = medium, 3 = low.
        pub priority: i32,
        pub is_achieved: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalCreate {
        pub name: String,
        pub description: Option<String>,
        pub target_amount_minor: i64,
        pub current_amount_minor: Option<i64>,
        pub target_date: Option<NaiveDate>,
        pub priority: Option<i32>,
    }

    /// Partial update: absent fields keep their stored value. The achieved
    /// flag is derived server-side and cannot be set directly.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub target_amount_minor: Option<i64>,
        /// Absent keeps the stored date, an explicit `null` clears it.
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub target_date: Option<Option<NaiveDate>>,
        pub priority: Option<i32>,
    }

    fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<NaiveDate>::deserialize(deserializer).map(Some)
    }

    /// Body for `POST /goals/{id}/add`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalAddMoney {
        pub amount_minor: i64,
    }
}

pub mod analytics {
    use super::*;

    /// Query for `GET /analytics/summary`; defaults to the current month.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub currency: Currency,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub net_minor: i64,
        pub income_count: u64,
        pub expense_count: u64,
        /// Net over income, percent. 0 when there is no income.
        pub savings_rate: f64,
        pub average_expense_minor: i64,
        /// Month-over-month expense growth, percent.
        pub expense_growth_rate: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        pub months: Option<usize>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthlyPoint {
        pub year: i32,
        pub month: u32,
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyResponse {
        pub months: Vec<MonthlyPoint>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalsQuery {
        pub limit: Option<usize>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub name: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalsResponse {
        pub categories: Vec<CategoryTotal>,
        pub total_expenses_minor: i64,
    }

    /// Expense totals bucketed Sunday..Saturday.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeekdayTotal {
        pub weekday: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeekdaysResponse {
        pub days: Vec<WeekdayTotal>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct PaymentMethodTotal {
        pub method: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodsResponse {
        pub methods: Vec<PaymentMethodTotal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyQuery {
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct DailyPoint {
        pub day: u32,
        pub cumulative_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyResponse {
        pub year: i32,
        pub month: u32,
        pub days: Vec<DailyPoint>,
    }
}

pub mod assistant {
    use super::*;
    use transaction::TransactionKind;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParseRequest {
        pub input: String,
    }

    /// A transaction draft extracted from natural language.
    ///
    /// Clients present this for confirmation before posting it to
    /// `POST /transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParsedTransactionResponse {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: String,
        pub category_id: Uuid,
        pub category_name: String,
        pub transaction_date: NaiveDate,
        pub payment_method: Option<String>,
        pub location: Option<String>,
        pub tags: Vec<String>,
        /// 0..=1; 0 means the model's category could not be matched.
        pub confidence: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorizeRequest {
        pub description: String,
        pub kind: TransactionKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySuggestionResponse {
        pub category_id: Uuid,
        pub category_name: String,
        /// 0..=1; 0 means the model answer could not be matched.
        pub confidence: f64,
    }
}
