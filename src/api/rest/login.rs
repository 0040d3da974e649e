//! Login endpoint

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use super::{ApiError, ApiResult};
use crate::api::websocket::state::AppState;
use crate::auth::LoginRequest;
use crate::error::{AuthError, SyncError};

/// POST /login - Verify credentials and return the user without its digest
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = request.username.clone().unwrap_or_default();
    match state.engine.authenticate(request).await {
        Ok(success) => Ok(Json(success)),
        Err(SyncError::Auth(err @ (AuthError::Unauthorized | AuthError::Forbidden))) => {
            tracing::info!(username = %username, reason = %err, "Login rejected");
            Err(ApiError::from(SyncError::Auth(err)))
        }
        Err(err) => Err(err.into()),
    }
}
