//! Error types shared across the crate

use thiserror::Error;

/// Failures of State Store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Outcomes of a failed login
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Invalid username or password")]
    Unauthorized,

    #[error("Your account is blocked")]
    Forbidden,
}

/// Errors surfaced by the synchronization engine and gateway
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Sync engine is not running")]
    EngineUnavailable,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub type SyncResult<T> = Result<T, SyncError>;
