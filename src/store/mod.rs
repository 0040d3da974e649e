//! State Store - owner of the shared market document
//!
//! The store performs no business-rule validation. It is owned by exactly one
//! task (see [`crate::sync::engine`]); everything else reaches it through
//! engine commands.

mod seed;

pub use seed::{generate_student_number, seed_defaults, SeedConfig};

use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::types::{Document, ShopItem, Team, User, UserPatch, ADMIN_USERNAME};

/// In-memory owner of the [`Document`]
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    document: Document,
}

impl StateStore {
    /// Create a store over an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an existing document
    pub fn with_document(document: Document) -> Self {
        Self { document }
    }

    /// Create a store seeded with the default demo data
    pub fn seeded(config: &SeedConfig) -> Self {
        let mut document = Document::new();
        seed_defaults(&mut document, config);
        Self { document }
    }

    /// The live document
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.document.users.get(username)
    }

    /// All users except the admin account
    pub fn list_users(&self) -> BTreeMap<String, User> {
        self.document
            .users
            .iter()
            .filter(|(name, _)| name.as_str() != ADMIN_USERNAME)
            .map(|(name, user)| (name.clone(), user.clone()))
            .collect()
    }

    /// Shallow-merge `patch` into an existing user
    ///
    /// Keys present in the patch overwrite the record's keys, explicit nulls
    /// included; everything else is left as is. Values are stored as sent.
    pub fn merge_user(&mut self, username: &str, patch: &UserPatch) -> StoreResult<&User> {
        let user = self
            .document
            .users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;

        user.merge(patch);
        Ok(&*user)
    }

    /// Replace the whole catalog
    pub fn replace_shop_items(&mut self, items: Vec<ShopItem>) {
        self.document.shop_items = items;
    }

    /// Replace the whole team list
    pub fn replace_teams(&mut self, teams: Vec<Team>) {
        self.document.teams = teams;
    }
}
