//! User read endpoints

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use super::{ApiError, ApiResult};
use crate::api::websocket::state::AppState;

/// GET /api/users - Every user except admin, digests stripped
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let users: BTreeMap<String, Value> = state
        .engine
        .list_users()
        .await?
        .into_iter()
        .map(|(name, user)| (name, user.public_view()))
        .collect();
    Ok(Json(users))
}

/// GET /api/users/:username - Single user, digest stripped
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // URL decode the name (handles spaces and non-ASCII usernames)
    let decoded = urlencoding::decode(&username)
        .unwrap_or_else(|_| username.clone().into())
        .into_owned();

    match state.engine.get_user(decoded.clone()).await? {
        Some(user) => Ok(Json(user.public_view())),
        None => Err(ApiError::not_found(format!("User '{}' not found", decoded))),
    }
}
