//! Savings goals API endpoints

use api_types::goal::{GoalAddMoney, GoalCreate, GoalListResponse, GoalUpdate, GoalView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::SavingsGoal;

const DEFAULT_PRIORITY: i32 = 2;

fn view(goal: SavingsGoal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name,
        description: goal.description,
        target_amount_minor: goal.target_amount_minor,
        current_amount_minor: goal.current_amount_minor,
        target_date: goal.target_date,
        priority: goal.priority,
        is_achieved: goal.is_achieved,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state.engine.list_goals().await?;
    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GoalCreate>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .create_goal(engine::GoalCreateCmd {
            name: payload.name,
            description: payload.description,
            target_amount_minor: payload.target_amount_minor,
            current_amount_minor: payload.current_amount_minor.unwrap_or(0),
            target_date: payload.target_date,
            priority: payload.priority.unwrap_or(DEFAULT_PRIORITY),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(goal))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .update_goal(engine::GoalUpdateCmd {
            goal_id: id,
            name: payload.name,
            description: payload.description,
            target_amount_minor: payload.target_amount_minor,
            target_date: payload.target_date,
            priority: payload.priority,
        })
        .await?;
    Ok(Json(view(goal)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_money(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalAddMoney>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.add_to_goal(id, payload.amount_minor).await?;
    Ok(Json(view(goal)))
}
