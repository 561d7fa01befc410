use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod service {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub service: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServiceInfo {
        pub message: String,
        pub version: String,
        pub endpoints: Vec<String>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i32,
        /// Major units with at most two decimals, e.g. `12.34`.
        pub amount: f64,
        pub category: String,
        pub description: String,
        pub date: NaiveDate,
    }

    /// Request body for creating an expense.
    ///
    /// Every field is optional on the wire so that a missing `amount` or
    /// `category` is reported by validation with a useful message.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: Option<f64>,
        pub category: Option<String>,
        pub description: Option<String>,
        /// `YYYY-MM-DD`; today when absent.
        pub date: Option<String>,
    }

    /// Request body for a partial update. Absent fields are left untouched.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount: Option<f64>,
        pub category: Option<String>,
        pub description: Option<String>,
        pub date: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseQuery {
        pub category: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub min_amount: Option<f64>,
        pub max_amount: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkFailureView {
        /// Position of the rejected entry in the request array.
        pub index: usize,
        pub error: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkResponse {
        pub inserted: Vec<ExpenseView>,
        pub failures: Vec<BulkFailureView>,
    }
}

pub mod category {
    use super::*;

    /// A category record. Budgets are major units; `None` means no budget.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        pub description: String,
        pub budget_limit: Option<f64>,
        pub monthly_budget: Option<f64>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: Option<String>,
        pub budget_limit: Option<f64>,
        pub monthly_budget: Option<f64>,
    }

    /// Request body for a partial update. Absent fields are left untouched.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub description: Option<String>,
        pub budget_limit: Option<f64>,
        pub monthly_budget: Option<f64>,
    }
}

pub mod stats {
    use std::collections::BTreeMap;

    use super::*;

    /// Named statistic results; a failed statistic is `{"error": "..."}`.
    pub type CustomStatisticsView = BTreeMap<String, serde_json::Value>;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct BudgetQuery {
        /// `YYYY-MM`; the current month when absent.
        pub month: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub category: String,
        pub spent: f64,
        pub budget_limit: Option<f64>,
        pub remaining: Option<f64>,
        pub month: String,
        pub spent_in_month: f64,
        pub monthly_budget: Option<f64>,
        pub remaining_in_month: Option<f64>,
        pub over_budget: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatisticsView {
        pub count: usize,
        pub total: f64,
        pub average: f64,
        pub min: Option<f64>,
        pub max: Option<f64>,
        pub by_category: BTreeMap<String, f64>,
        /// Keyed by `YYYY-MM`.
        pub by_month: BTreeMap<String, f64>,
    }
}
