use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use std::sync::Arc;

use crate::{budgets, categories, expenses, service, statistics};
use engine::Tracker;

#[derive(Clone)]
pub struct ServerState {
    pub tracker: Arc<Tracker>,
}

pub fn router(tracker: Tracker) -> Router {
    let state = ServerState {
        tracker: Arc::new(tracker),
    };

    Router::new()
        .route("/", get(service::info))
        .route("/health", get(service::health))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/bulk", post(expenses::bulk))
        .route("/expenses/filter", get(expenses::filter))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/categories", get(categories::list))
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{name}",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        .route("/statistics", get(statistics::get_stats))
        .route("/statistics/custom", get(statistics::get_custom))
        .route("/statistics/custom/{name}", get(statistics::get_named))
        .route("/statistics/budgets", get(statistics::get_budgets))
        .with_state(state)
}

/// Bind `addr` and serve until the process stops.
pub async fn run(tracker: Tracker, addr: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    run_with_listener(tracker, listener).await
}

pub async fn run_with_listener(tracker: Tracker, listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(tracker)).await
}
