use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener};

mod budgets;
mod categories;
mod expenses;
mod server;
mod service;
mod statistics;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            BulkFailureView, BulkResponse, ExpenseNew, ExpenseQuery, ExpenseUpdate, ExpenseView,
        };
    }

    pub mod category {
        pub use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
    }

    pub mod service {
        pub use api_types::service::{Health, ServiceInfo};
    }

    pub mod stats {
        pub use api_types::stats::{
            BudgetQuery, BudgetStatusView, CustomStatisticsView, StatisticsView,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidFilter(_)
        | EngineError::InvalidBudget(_)
        | EngineError::Import(_) => StatusCode::BAD_REQUEST,
        EngineError::AmountOverflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Io(_) | EngineError::Json(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Io(io_err) => {
            tracing::error!("io error: {io_err}");
            "internal server error".to_string()
        }
        EngineError::Json(json_err) => {
            tracing::error!("serialization error: {json_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidCategory("x".to_string()),
            EngineError::InvalidDate("x".to_string()),
            EngineError::InvalidFilter("x".to_string()),
            EngineError::InvalidBudget("x".to_string()),
            EngineError::Import("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn taken_name_maps_to_409_and_overflow_to_422() {
        let res = ServerError::from(EngineError::ExistingKey("category Food".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = ServerError::from(EngineError::AmountOverflow("total".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_errors_map_to_500() {
        let res = ServerError::from(EngineError::Io(std::io::Error::other("disk full")))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            message_for_engine_error(EngineError::Io(std::io::Error::other("disk full"))),
            "internal server error"
        );
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
