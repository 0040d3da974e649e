//! Login against the users stored in the market document
//!
//! Credentials are checked against the document's password digests. A
//! successful login returns the user record without its digest.

mod password;

pub use password::{hash_password_bcrypt, legacy_hash, verify_password};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuthError;
use crate::store::StateStore;

/// Body of `POST /login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Successful login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSuccess {
    pub success: bool,
    pub is_admin: bool,
    pub user: Value,
}

/// Verify a login request against the store
pub fn authenticate(store: &StateStore, request: &LoginRequest) -> Result<LoginSuccess, AuthError> {
    let (username, password) = match (request.username.as_deref(), request.password.as_deref()) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(AuthError::MissingCredentials),
    };

    let user = store.get_user(username).ok_or(AuthError::Unauthorized)?;
    let digest = user.password_hash().ok_or(AuthError::Unauthorized)?;
    if !verify_password(password, digest) {
        return Err(AuthError::Unauthorized);
    }

    if user.is_blocked() {
        return Err(AuthError::Forbidden);
    }

    tracing::info!(username = %username, "User logged in");
    Ok(LoginSuccess {
        success: true,
        is_admin: user.is_admin(),
        user: user.public_view(),
    })
}
