//! Rich presence activity entity model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use presence_core::types::id::ApplicationId;
use presence_core::types::json::stringify_ids;

/// Start/end timestamps of an activity, in Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTimestamps {
    /// When the activity started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// When the activity ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

/// What a user is currently doing: a game, music, a stream, a custom status.
///
/// The commonly used fields are typed; everything else the gateway sends
/// (assets, party, emoji, buttons, flags, ...) is kept verbatim in `extra`
/// and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity name.
    pub name: String,
    /// Activity type (0 playing, 1 streaming, 2 listening, 3 watching,
    /// 4 custom, 5 competing).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
    /// Stream URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the activity was added to the session, Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Start/end timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<ActivityTimestamps>,
    /// Application the activity belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    /// What the user is doing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The user's current party status, or custom status text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Every other field, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// Convert to the JSON object served to API clients.
    pub fn to_json(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => stringify_ids(value),
            // Serializing plain strings, integers, and a JSON map cannot fail.
            Err(_) => Value::Object(Map::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pass_through_fields_survive() {
        let raw = json!({
            "name": "Spotify",
            "type": 2,
            "id": "spotify:1",
            "details": "Song",
            "state": "Artist",
            "timestamps": {"start": 1700000000000i64, "end": 1700000200000i64},
            "assets": {"large_image": "spotify:ab67"},
            "party": {"id": "spotify:42"},
            "sync_id": "6rqhFgbbKwnb9MLmUQDhG6",
            "flags": 48,
        });
        let activity: Activity = serde_json::from_value(raw.clone()).expect("deserialize");
        assert_eq!(activity.kind, Some(2));
        assert_eq!(activity.extra["sync_id"], "6rqhFgbbKwnb9MLmUQDhG6");
        assert_eq!(activity.to_json(), raw);
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let raw = json!({
            "name": "Chess",
            "type": 0,
            "application_id": 383226320970055681u64,
            "party": {"owner_id": 5},
        });
        let activity: Activity = serde_json::from_value(raw).expect("deserialize");
        let out = activity.to_json();
        assert_eq!(out["application_id"], "383226320970055681");
        assert_eq!(out["party"]["owner_id"], "5");
    }

    #[test]
    fn test_missing_type_is_not_invented() {
        let activity: Activity = serde_json::from_value(json!({"name": "Chess"})).unwrap();
        assert_eq!(activity.kind, None);
        assert_eq!(activity.to_json(), json!({"name": "Chess"}));
    }

    #[test]
    fn test_explicit_zero_type_survives() {
        let raw = json!({"name": "Chess", "type": 0});
        let activity: Activity = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(activity.to_json(), raw);
    }
}
