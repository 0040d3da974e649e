//! Push-channel message types
//!
//! Every message is an envelope `{ "type": ..., "payload": ... }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Document, ShopItem, Team, UserPatch};

/// Messages accepted from a peer
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Declare the identity of this session
    Register(String),

    /// Push a local change to the shared document
    ClientUpdate(ClientUpdate),
}

/// Payload of a `client_update` message
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    /// User whose record `user_data` is merged into
    #[serde(default)]
    pub current_user: String,
    #[serde(default)]
    pub user_data: UserPatch,
    /// Full replacement catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_items: Option<Vec<ShopItem>>,
    /// Full replacement team list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<Team>>,
}

/// Body of `POST /api/data`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdate {
    /// Username -> partial fields; required
    #[serde(default)]
    pub user: Option<BTreeMap<String, UserPatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_items: Option<Vec<ShopItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<Team>>,
}

/// Messages sent to peers
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    /// The entire current document
    FullUpdate(&'a Document),
}
