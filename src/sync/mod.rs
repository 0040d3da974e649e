//! State synchronization subsystem
//!
//! - `registry`: identity -> session metadata
//! - `reconcile`: merge rules for incoming updates
//! - `engine`: single-writer task owning the store
//! - `broadcaster`: full-document fan-out to every open session
//! - `messages`: push-channel envelopes

pub mod broadcaster;
pub mod engine;
pub mod messages;
pub mod reconcile;
pub mod registry;

pub use broadcaster::{Broadcaster, FullUpdate};
pub use engine::{spawn_engine, EngineHandle};
pub use messages::{BulkUpdate, ClientMessage, ClientUpdate, ServerMessage};
pub use reconcile::UpdateOutcome;
pub use registry::{ConnectionRegistry, SessionHandle, SessionId};
