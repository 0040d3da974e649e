//! WebSocket session handler

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::timeout;

use super::state::AppState;
use crate::sync::{ClientMessage, SessionHandle};

/// A session whose socket accepts nothing for this long is dropped
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Send one frame, giving up after [`SEND_TIMEOUT`]
async fn send_bounded(socket: &mut WebSocket, msg: Message) -> bool {
    matches!(timeout(SEND_TIMEOUT, socket.send(msg)).await, Ok(Ok(())))
}

/// Handle an individual WebSocket session
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let session = state.registry.open_session();
    // Subscribe before anything else so no broadcast after accept is missed
    let mut rx = state.broadcaster.subscribe();
    tracing::info!(session_id = session.id, "Client connected via WebSocket");

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        if !send_bounded(&mut socket, Message::Text(update.json.to_string())).await {
                            tracing::warn!(
                                session_id = session.id,
                                sequence_id = update.sequence_id,
                                "Delivery failed, closing session"
                            );
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Newer full updates supersede the skipped ones
                        tracing::warn!(session_id = session.id, skipped, "Session lagging behind broadcasts");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &session, &state, &mut socket).await {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(session_id = session.id, error = %e, "WebSocket error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    let identities = state.registry.deregister(&session);
    if identities.is_empty() {
        tracing::info!(session_id = session.id, "Client disconnected");
    } else {
        tracing::info!(session_id = session.id, identities = ?identities, "User disconnected");
    }
}

/// Handle a message from the peer
/// Returns false if the session should be closed
async fn handle_client_message(
    msg: Message,
    session: &SessionHandle,
    state: &AppState,
    socket: &mut WebSocket,
) -> bool {
    match msg {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Register(identity)) => {
                    let previous = state.registry.register(identity.clone(), session.clone());
                    match previous {
                        Some(old) if old != *session => tracing::info!(
                            session_id = session.id,
                            previous_session = old.id,
                            identity = %identity,
                            "User re-registered from a new session"
                        ),
                        _ => tracing::info!(
                            session_id = session.id,
                            identity = %identity,
                            "User registered for updates"
                        ),
                    }
                }
                Ok(ClientMessage::ClientUpdate(update)) => {
                    let from = update.current_user.clone();
                    tracing::debug!(session_id = session.id, user = %from, "Received client update");
                    if let Err(e) = state.engine.apply_client_update(update).await {
                        tracing::error!(session_id = session.id, user = %from, error = %e, "Client update failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = session.id,
                        error = %e,
                        "Failed to decode message, discarding"
                    );
                }
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => send_bounded(socket, Message::Pong(data)).await,
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
