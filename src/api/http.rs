//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::{data, login, users};
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Front ends are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint; peers may also upgrade on the root path
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/login", post(login::login))
        .route("/api/data", get(data::get_data).post(data::post_data))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:username", get(users::get_user))
        .route("/api/info", get(server_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Response for GET /api/info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoResponse {
    pub name: String,
    pub version: String,
    pub open_sessions: usize,
    pub registered_identities: Vec<String>,
    pub broadcasts_sent: u64,
}

async fn server_info(State(state): State<Arc<AppState>>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        open_sessions: state.session_count(),
        registered_identities: state.registry.identities(),
        broadcasts_sent: state.broadcaster.broadcasts_sent(),
    })
}
