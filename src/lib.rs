//! Market Sync Server
//!
//! A shared-state broadcast backend for a classroom market simulation. Every
//! front end keeps a local copy of one document (users, shop catalog, teams,
//! settings); any of them may change it, and every open WebSocket session
//! receives the full document after each change.
//!
//! # Modules
//!
//! - `types`: The document and its records (User, ShopItem, Settings)
//! - `store`: State Store owning the document, plus default seeding
//! - `sync`: Connection registry, reconciliation, single-writer engine, broadcaster
//! - `auth`: Login against stored password digests
//! - `api`: Axum router with the WebSocket push channel and REST mirror
//! - `config`: Environment-driven server configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use market_sync::{create_router, AppState, ServerConfig, StateStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env();
//!     let state = Arc::new(AppState::new(StateStore::seeded(&config.seed), &config));
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, create_router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod store;
pub mod sync;
pub mod types;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use error::{AuthError, StoreError, SyncError};
pub use store::{SeedConfig, StateStore};
pub use sync::{Broadcaster, ConnectionRegistry, EngineHandle};
pub use types::{Document, NewShopItem, Settings, ShopItem, StudentId, User, UserPatch};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
