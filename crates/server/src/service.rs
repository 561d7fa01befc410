//! Service level endpoints.

use api_types::service::{Health, ServiceInfo};
use axum::Json;

const SERVICE_NAME: &str = "spendlog";

pub async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Spendlog expense tracker API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: [
            "/health",
            "/expenses",
            "/expenses/bulk",
            "/expenses/filter",
            "/expenses/{id}",
            "/categories",
            "/budgets",
            "/budgets/{name}",
            "/statistics",
            "/statistics/custom",
            "/statistics/custom/{name}",
            "/statistics/budgets",
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
    })
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
