//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the push channel and the request/response mirror that
//! front ends use to share the market document.

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::create_router;
pub use websocket::AppState;
