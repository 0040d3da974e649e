//! Shop catalog types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalog entry as held in the document
///
/// Front ends replace the catalog wholesale with whatever items they hold,
/// so entries are carried verbatim without any shape or type checks.
pub type ShopItem = Value;

/// Typed form of a catalog entry created by the server itself
///
/// Ids look monotonic (millisecond timestamps) but uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShopItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub quantity: i64,
    pub category: String,
    pub description: String,
    pub image: String,
    pub popularity: f64,
}

impl NewShopItem {
    /// Wire form stored in the catalog
    pub fn into_record(self) -> ShopItem {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
