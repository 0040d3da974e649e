//! Data types for the market document
//!
//! This module contains the wire-compatible structures every front end holds
//! a copy of.

mod document;
mod shop;
mod user;

pub use document::{Document, Settings, Team, ADMIN_USERNAME};
pub use shop::{NewShopItem, ShopItem};
pub use user::{StudentId, User, UserPatch, PASSWORD_KEY};
