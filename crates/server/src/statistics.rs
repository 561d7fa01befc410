//! Statistics API endpoints

use std::collections::BTreeMap;

use api_types::{
    expense::ExpenseQuery,
    stats::{BudgetQuery, BudgetStatusView, CustomStatisticsView, StatisticsView},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use engine::{Amount, BudgetStatus, Summary, parse_month};

use crate::{ServerError, expenses::filter_from, server::ServerState};

fn to_major(subtotals: BTreeMap<String, Amount>) -> BTreeMap<String, f64> {
    subtotals
        .into_iter()
        .map(|(key, amount)| (key, amount.to_f64()))
        .collect()
}

fn map_summary(summary: Summary) -> StatisticsView {
    StatisticsView {
        count: summary.count,
        total: summary.total.to_f64(),
        average: summary.average.to_f64(),
        min: summary.min.map(Amount::to_f64),
        max: summary.max.map(Amount::to_f64),
        by_category: to_major(summary.by_category),
        by_month: to_major(summary.by_month),
    }
}

fn map_budget(status: BudgetStatus) -> BudgetStatusView {
    BudgetStatusView {
        category: status.category,
        spent: status.spent.to_f64(),
        budget_limit: status.budget_limit.map(Amount::to_f64),
        remaining: status.remaining.map(Amount::to_f64),
        month: status.month,
        spent_in_month: status.spent_in_month.to_f64(),
        monthly_budget: status.monthly_budget.map(Amount::to_f64),
        remaining_in_month: status.remaining_in_month.map(Amount::to_f64),
        over_budget: status.over_budget,
    }
}

/// Handle requests for statistics over all expenses or a filtered subset
pub async fn get_stats(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<StatisticsView>, ServerError> {
    let Query(query) = query?;
    let criteria = filter_from(query)?;
    let summary = if criteria.is_empty() {
        state.tracker.view_statistics(None).await?
    } else {
        state.tracker.view_statistics(Some(&criteria)).await?
    };

    Ok(Json(map_summary(summary)))
}

/// Every registered statistic, over all expenses or a filtered subset
pub async fn get_custom(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<CustomStatisticsView>, ServerError> {
    let Query(query) = query?;
    let criteria = filter_from(query)?;
    let criteria = (!criteria.is_empty()).then_some(&criteria);

    Ok(Json(state.tracker.custom_statistics(criteria).await?))
}

/// One registered statistic by name
pub async fn get_named(
    State(state): State<ServerState>,
    name: Result<Path<String>, PathRejection>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let Path(name) = name?;
    let Query(query) = query?;
    let criteria = filter_from(query)?;
    let criteria = (!criteria.is_empty()).then_some(&criteria);

    Ok(Json(state.tracker.compute_statistic(&name, criteria).await?))
}

/// Spending against budgets for every category record
pub async fn get_budgets(
    State(state): State<ServerState>,
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Json<Vec<BudgetStatusView>>, ServerError> {
    let Query(query) = query?;
    let month = query
        .month
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(parse_month)
        .transpose()?;
    let report = state.tracker.budget_report(month).await?;

    Ok(Json(report.into_iter().map(map_budget).collect()))
}
