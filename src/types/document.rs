//! The shared market document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ShopItem, User};

/// Username of the distinguished administrator account
pub const ADMIN_USERNAME: &str = "admin";

/// Opaque team record, passed through unmodified
pub type Team = Value;

/// Market-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub initial_balance: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self { initial_balance: 100 }
    }
}

/// The single shared state every front end mirrors
///
/// Users are keyed by username in a `BTreeMap` so that serializing an
/// unchanged document always yields the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "user", alias = "users", default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub shop_items: Vec<ShopItem>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub settings: Settings,
}

impl Document {
    /// Create an empty document with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users, admin included
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
