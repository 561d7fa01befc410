//! Expenses API endpoints.

use api_types::expense::{
    BulkFailureView, BulkResponse, ExpenseNew, ExpenseQuery, ExpenseUpdate, ExpenseView,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{BulkOutcome, Expense, ExpenseFields, ExpenseFilter, ExpensePatch, FilterParams};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount.to_f64(),
        category: expense.category,
        description: expense.description,
        date: expense.date,
    }
}

fn map_outcome(outcome: BulkOutcome) -> BulkResponse {
    BulkResponse {
        inserted: outcome.inserted.into_iter().map(map_expense).collect(),
        failures: outcome
            .failures
            .into_iter()
            .map(|failure| BulkFailureView {
                index: failure.index,
                error: failure.error,
            })
            .collect(),
    }
}

fn fields_from(payload: ExpenseNew) -> ExpenseFields {
    ExpenseFields {
        amount: payload.amount,
        category: payload.category,
        description: payload.description,
        date: payload.date,
    }
}

pub(crate) fn filter_from(query: ExpenseQuery) -> Result<ExpenseFilter, ServerError> {
    let params = FilterParams {
        category: query.category,
        start_date: query.start_date,
        end_date: query.end_date,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
    };
    Ok(ExpenseFilter::try_from(params)?)
}

/// Every expense, or the matching ones when filters are given.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let Query(query) = query?;
    let criteria = filter_from(query)?;
    let expenses = if criteria.is_empty() {
        state.tracker.view_all().await?
    } else {
        state.tracker.filter_expenses(&criteria).await?
    };

    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

pub async fn filter(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let Query(query) = query?;
    let criteria = filter_from(query)?;
    let expenses = state.tracker.filter_expenses(&criteria).await?;

    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let Json(payload) = payload?;
    let expense = state.tracker.add_fields(fields_from(payload)).await?;

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

/// Stores every valid entry and reports the rejected ones by index.
pub async fn bulk(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<ExpenseNew>>, JsonRejection>,
) -> Result<Json<BulkResponse>, ServerError> {
    let Json(payload) = payload?;
    let entries = payload.into_iter().map(fields_from).collect();
    let outcome = state.tracker.bulk_add(entries).await?;

    Ok(Json(map_outcome(outcome)))
}

pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Path(id) = id?;
    let expense = state.tracker.get_expense(id).await?;

    Ok(Json(map_expense(expense)))
}

pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = ExpensePatch {
        amount: payload.amount,
        category: payload.category,
        description: payload.description,
        date: payload.date,
    };
    if patch.is_empty() {
        return Err(ServerError::Generic("No fields to update".to_string()));
    }

    let expense = state.tracker.update_expense(id, patch).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.tracker.delete_expense(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
