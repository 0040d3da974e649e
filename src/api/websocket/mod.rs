//! WebSocket push channel
//!
//! Peers send `register` and `client_update` envelopes; every open session
//! receives a `full_update` after each applied change.

pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::AppState;
