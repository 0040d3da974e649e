//! Document mirror endpoints

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use super::{ApiMessage, ApiResult};
use crate::api::websocket::state::AppState;
use crate::sync::BulkUpdate;

/// GET /api/data - Entire current document
pub async fn get_data(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let document = state.engine.document().await?;
    Ok(Json(document))
}

/// POST /api/data - Merge many users, optionally replace shop/teams, then broadcast once
pub async fn post_data(
    State(state): State<Arc<AppState>>,
    Json(update): Json<BulkUpdate>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.engine.apply_bulk_update(update).await?;
    tracing::debug!(
        merged = outcome.merged.len(),
        not_found = outcome.not_found.len(),
        "Bulk update via HTTP"
    );
    Ok(Json(ApiMessage::ok("Data updated successfully.")))
}
