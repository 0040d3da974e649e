//! User record type

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Partial user fields sent by a front end, merged shallowly into a [`User`]
pub type UserPatch = Map<String, Value>;

/// Wire key of the password digest
pub const PASSWORD_KEY: &str = "password";

/// Older front ends send the digest under this key
const PASSWORD_ALIAS: &str = "passwordHash";

/// Student identity card attached to every non-admin user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StudentId {
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub name: String,
    /// ISO date string (YYYY-MM-DD)
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub room: String,
}

/// A market participant
///
/// The record is kept as the JSON object the front ends send. Values are
/// stored exactly as received, explicit nulls included, and never checked
/// for type. The server only reads a handful of fields through the typed
/// accessors below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct User {
    fields: Map<String, Value>,
}

impl User {
    /// Create the bare admin record
    pub fn admin(password_hash: String) -> Self {
        let mut fields = Map::new();
        fields.insert(PASSWORD_KEY.to_string(), Value::String(password_hash));
        fields.insert("isAdmin".to_string(), Value::Bool(true));
        Self { fields }
    }

    /// Create a regular participant with an empty ledger and no team
    pub fn participant(password_hash: String, balance: i64, photo: String, student_id: StudentId) -> Self {
        let record = json!({
            "password": password_hash,
            "balance": balance,
            "transactions": [],
            "isBlocked": false,
            "totalSent": 0,
            "photo": photo,
            "team": null,
            "studentID": student_id,
        });
        match record {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Stored password digest, if the record carries one as a string
    pub fn password_hash(&self) -> Option<&str> {
        self.fields
            .get(PASSWORD_KEY)
            .or_else(|| self.fields.get(PASSWORD_ALIAS))
            .and_then(Value::as_str)
    }

    pub fn is_admin(&self) -> bool {
        self.flag("isAdmin")
    }

    pub fn is_blocked(&self) -> bool {
        self.flag("isBlocked")
    }

    /// Raw value of a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Overlay every key of `patch` onto the record, nulls included
    pub fn merge(&mut self, patch: &UserPatch) {
        for (key, value) in patch {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// JSON view of the record with the password digest removed
    pub fn public_view(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.remove(PASSWORD_KEY);
        fields.remove(PASSWORD_ALIAS);
        Value::Object(fields)
    }

    fn flag(&self, key: &str) -> bool {
        self.fields.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<Map<String, Value>> for User {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_serializes_without_shop_fields() {
        let admin = User::admin("-969161597".to_string());
        let value = serde_json::to_value(&admin).unwrap();
        assert_eq!(value, json!({ "password": "-969161597", "isAdmin": true }));
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let user: User = serde_json::from_value(json!({
            "password": "1",
            "balance": 10,
            "nickname": "ace"
        }))
        .unwrap();

        assert_eq!(user.get("nickname"), Some(&json!("ace")));
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["nickname"], json!("ace"));
    }

    #[test]
    fn test_password_hash_alias() {
        let user: User = serde_json::from_value(json!({ "passwordHash": "42" })).unwrap();
        assert_eq!(user.password_hash(), Some("42"));
    }

    #[test]
    fn test_participant_wire_shape_has_null_team() {
        let user = User::participant("123".to_string(), 100, "./foto1.png".to_string(), StudentId::default());
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["team"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("team"));
        assert_eq!(value["transactions"], json!([]));
        assert_eq!(value["totalSent"], json!(0));
    }

    #[test]
    fn test_values_of_any_type_are_accepted() {
        let user: User = serde_json::from_value(json!({
            "password": "1",
            "balance": "abc",
            "isBlocked": "yes",
            "photo": null
        }))
        .unwrap();

        assert_eq!(user.get("balance"), Some(&json!("abc")));
        assert!(!user.is_blocked());
        assert_eq!(user.get("photo"), Some(&Value::Null));
    }

    #[test]
    fn test_public_view_strips_digest() {
        let user = User::participant("123".to_string(), 100, "./foto1.png".to_string(), StudentId::default());
        let view = user.public_view();
        assert!(view.get("password").is_none());
        assert_eq!(view["balance"], json!(100));
        assert_eq!(view["isBlocked"], json!(false));
    }
}
