use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::savings_goals::{PRIORITY_HIGH, PRIORITY_LOW};
use crate::{EngineError, ResultEngine, SavingsGoal, savings_goals};

use super::{Engine, normalize_optional_text, with_tx};

/// Fields accepted when creating a savings goal.
#[derive(Clone, Debug)]
pub struct GoalCreateCmd {
    pub name: String,
    pub description: Option<String>,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub target_date: Option<NaiveDate>,
    pub priority: i32,
}

/// Partial update: `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct GoalUpdateCmd {
    pub goal_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount_minor: Option<i64>,
    pub target_date: Option<Option<NaiveDate>>,
    pub priority: Option<i32>,
}

fn validate_priority(priority: i32) -> ResultEngine<()> {
    if !(PRIORITY_HIGH..=PRIORITY_LOW).contains(&priority) {
        return Err(EngineError::InvalidAmount(format!(
            "priority must be between {PRIORITY_HIGH} and {PRIORITY_LOW}"
        )));
    }
    Ok(())
}

fn required_goal_name(value: &str) -> ResultEngine<String> {
    normalize_optional_text(Some(value))
        .ok_or_else(|| EngineError::InvalidName("goal name must not be empty".to_string()))
}

impl Engine {
    /// Lists savings goals, most urgent priority first, then newest.
    pub async fn list_goals(&self) -> ResultEngine<Vec<SavingsGoal>> {
        with_tx!(self, |db_tx| {
            let models = savings_goals::Entity::find()
                .order_by_asc(savings_goals::Column::Priority)
                .order_by_desc(savings_goals::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(SavingsGoal::from).collect())
        })
    }

    /// Creates a savings goal. A goal can start with money already set
    /// aside, and is achieved from the outset if that covers the target.
    pub async fn create_goal(&self, cmd: GoalCreateCmd) -> ResultEngine<SavingsGoal> {
        if cmd.target_amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_amount_minor must be > 0".to_string(),
            ));
        }
        if cmd.current_amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "current_amount_minor must be >= 0".to_string(),
            ));
        }
        validate_priority(cmd.priority)?;
        let now = Utc::now();
        let mut goal = SavingsGoal {
            id: Uuid::new_v4(),
            name: required_goal_name(&cmd.name)?,
            description: normalize_optional_text(cmd.description.as_deref()),
            target_amount_minor: cmd.target_amount_minor,
            current_amount_minor: cmd.current_amount_minor,
            target_date: cmd.target_date,
            priority: cmd.priority,
            is_achieved: false,
            created_at: now,
            updated_at: now,
        };
        goal.is_achieved = goal.target_reached();
        with_tx!(self, |db_tx| {
            savings_goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal.clone())
        })
    }

    /// Updates a goal's metadata or target. The achieved flag is recomputed
    /// when the target moves.
    pub async fn update_goal(&self, cmd: GoalUpdateCmd) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            let model = savings_goals::Entity::find_by_id(cmd.goal_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))?;
            let mut goal = SavingsGoal::from(model);

            if let Some(name) = cmd.name.as_deref() {
                goal.name = required_goal_name(name)?;
            }
            if let Some(description) = cmd.description.as_deref() {
                goal.description = normalize_optional_text(Some(description));
            }
            if let Some(target_amount_minor) = cmd.target_amount_minor {
                if target_amount_minor <= 0 {
                    return Err(EngineError::InvalidAmount(
                        "target_amount_minor must be > 0".to_string(),
                    ));
                }
                goal.target_amount_minor = target_amount_minor;
            }
            if let Some(target_date) = cmd.target_date {
                goal.target_date = target_date;
            }
            if let Some(priority) = cmd.priority {
                validate_priority(priority)?;
                goal.priority = priority;
            }
            goal.is_achieved = goal.target_reached();
            goal.updated_at = Utc::now();

            savings_goals::ActiveModel::from(&goal).update(&db_tx).await?;
            Ok(goal.clone())
        })
    }

    /// Removes a savings goal.
    pub async fn delete_goal(&self, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = savings_goals::Entity::delete_by_id(goal_id)
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("goal not exists".to_string()));
            }
            Ok(())
        })
    }

    /// Adds money toward a goal, flipping the achieved flag once the saved
    /// amount reaches the target.
    pub async fn add_to_goal(&self, goal_id: Uuid, amount_minor: i64) -> ResultEngine<SavingsGoal> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = savings_goals::Entity::find_by_id(goal_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))?;
            let mut goal = SavingsGoal::from(model);
            goal.current_amount_minor = goal
                .current_amount_minor
                .checked_add(amount_minor)
                .ok_or_else(|| {
                    EngineError::InvalidAmount("amount_minor overflows the saved total".to_string())
                })?;
            goal.is_achieved = goal.target_reached();
            goal.updated_at = Utc::now();

            savings_goals::ActiveModel::from(&goal).update(&db_tx).await?;
            Ok(goal.clone())
        })
    }
}
