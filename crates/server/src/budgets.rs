//! Category budget API endpoints.

use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{Amount, Category, CategoryFields, CategoryPatch};

use crate::{ServerError, server::ServerState};

fn map_category(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
        budget_limit: category.budget_limit.map(Amount::to_f64),
        monthly_budget: category.monthly_budget.map(Amount::to_f64),
    }
}

/// Category records, sorted by name.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.tracker.list_categories().await?;
    Ok(Json(categories.into_iter().map(map_category).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let fields = CategoryFields {
        name: payload.name,
        description: payload.description,
        budget_limit: payload.budget_limit,
        monthly_budget: payload.monthly_budget,
    };
    let category = state.tracker.create_category(fields).await?;

    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn get(
    State(state): State<ServerState>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Path(name) = name?;
    Ok(Json(map_category(state.tracker.get_category(&name).await?)))
}

pub async fn update(
    State(state): State<ServerState>,
    name: Result<Path<String>, PathRejection>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Path(name) = name?;
    let Json(payload) = payload?;
    let patch = CategoryPatch {
        description: payload.description,
        budget_limit: payload.budget_limit,
        monthly_budget: payload.monthly_budget,
    };
    if patch.is_empty() {
        return Err(ServerError::Generic("No fields to update".to_string()));
    }

    let category = state.tracker.update_category(&name, patch).await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    name: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(name) = name?;
    state.tracker.delete_category(&name).await?;

    Ok(StatusCode::NO_CONTENT)
}
