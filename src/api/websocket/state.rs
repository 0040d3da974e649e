//! Shared application state for the gateway

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::StateStore;
use crate::sync::{spawn_engine, Broadcaster, ConnectionRegistry, EngineHandle};

/// State shared by every HTTP handler and WebSocket session
pub struct AppState {
    /// Single writer of the market document
    pub engine: EngineHandle,

    /// Identity -> session metadata
    pub registry: ConnectionRegistry,

    /// Full-update fan-out to all open sessions
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    /// Start the sync engine over `store` and build the state around it
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: StateStore, config: &ServerConfig) -> Self {
        let broadcaster = Arc::new(Broadcaster::new(config.broadcast_capacity));
        let engine = spawn_engine(store, broadcaster.clone(), config.command_queue);
        Self {
            engine,
            registry: ConnectionRegistry::new(),
            broadcaster,
        }
    }

    /// Number of open WebSocket sessions
    pub fn session_count(&self) -> usize {
        self.broadcaster.session_count()
    }
}
