//! Categories API endpoints

use api_types::category::{CategoryCreate, CategoryListQuery, CategoryListResponse, CategoryView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::Category;

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
        color: category.color,
        icon: category.icon,
        is_income: category.is_income,
        is_active: category.is_active,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(query.include_inactive.unwrap_or(false), query.is_income)
        .await?;
    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(engine::CategoryCreateCmd {
            name: payload.name,
            description: payload.description,
            color: payload.color,
            icon: payload.icon,
            is_income: payload.is_income,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

#[derive(Deserialize)]
pub struct SetActive {
    pub active: bool,
}

pub async fn set_active(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActive>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.set_category_active(id, payload.active).await?;
    Ok(Json(view(category)))
}
