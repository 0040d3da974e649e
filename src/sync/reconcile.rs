//! Reconciliation of incoming updates into the store
//!
//! Merges are coarse last-write-wins: one user's record is merged field by
//! field, while the shop catalog and team list are replaced wholesale. A later
//! replacement discards whatever an earlier one did to the same collection.

use serde::Serialize;

use super::messages::{BulkUpdate, ClientUpdate};
use crate::error::{StoreError, SyncError, SyncResult};
use crate::store::StateStore;
use crate::types::UserPatch;

/// What an update did to the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Users whose records were merged
    pub merged: Vec<String>,
    /// Usernames that did not exist
    pub not_found: Vec<String>,
    pub shop_items_replaced: bool,
    pub teams_replaced: bool,
}

impl UpdateOutcome {
    fn record_merge(&mut self, store: &mut StateStore, username: &str, patch: &UserPatch) {
        match store.merge_user(username, patch) {
            Ok(_) => self.merged.push(username.to_string()),
            Err(StoreError::UserNotFound(_)) => {
                tracing::debug!(username = %username, "Merge target not found, skipping");
                self.not_found.push(username.to_string());
            }
        }
    }
}

/// Apply a `client_update` envelope
///
/// Absent collections are left alone rather than cleared.
pub fn apply_client_update(store: &mut StateStore, update: ClientUpdate) -> UpdateOutcome {
    let mut outcome = UpdateOutcome::default();
    outcome.record_merge(store, &update.current_user, &update.user_data);

    if let Some(items) = update.shop_items {
        store.replace_shop_items(items);
        outcome.shop_items_replaced = true;
    }
    if let Some(teams) = update.teams {
        store.replace_teams(teams);
        outcome.teams_replaced = true;
    }
    outcome
}

/// Apply a bulk update from the HTTP mirror
///
/// Fails without touching the store if `user` is absent.
pub fn apply_bulk_update(store: &mut StateStore, update: BulkUpdate) -> SyncResult<UpdateOutcome> {
    let users = update
        .user
        .ok_or_else(|| SyncError::Validation("user data is missing".to_string()))?;

    let mut outcome = UpdateOutcome::default();
    for (username, patch) in &users {
        outcome.record_merge(store, username, patch);
    }

    if let Some(items) = update.shop_items {
        store.replace_shop_items(items);
        outcome.shop_items_replaced = true;
    }
    if let Some(teams) = update.teams {
        store.replace_teams(teams);
        outcome.teams_replaced = true;
    }
    Ok(outcome)
}
