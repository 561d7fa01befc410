//! Categories API endpoints.

use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Distinct categories currently in use, sorted.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<String>>, ServerError> {
    Ok(Json(state.tracker.categories().await?))
}
