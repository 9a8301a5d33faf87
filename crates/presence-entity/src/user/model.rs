//! User entity model.

use std::fmt;

use serde::{Deserialize, Serialize};

use presence_core::types::id::UserId;

/// A Discord user as seen by the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique account name.
    pub username: String,
    /// Legacy four-digit tag; `"0"` for accounts on the new username system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    /// Display name chosen by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Whether the user still carries a legacy discriminator.
    pub fn has_legacy_tag(&self) -> bool {
        matches!(self.discriminator.as_deref(), Some(d) if !d.is_empty() && d != "0")
    }
}

/// Renders `name#1234` for legacy accounts and `name` otherwise.
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.discriminator.as_deref() {
            Some(tag) if self.has_legacy_tag() => write!(f, "{}#{}", self.username, tag),
            _ => write!(f, "{}", self.username),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(discriminator: Option<&str>) -> User {
        User {
            id: UserId::new(1),
            username: "nelly".to_string(),
            discriminator: discriminator.map(String::from),
            global_name: Some("Nelly".to_string()),
            bot: false,
        }
    }

    #[test]
    fn test_display_legacy_tag() {
        assert_eq!(user(Some("1337")).to_string(), "nelly#1337");
    }

    #[test]
    fn test_display_new_username_system() {
        assert_eq!(user(Some("0")).to_string(), "nelly");
        assert_eq!(user(None).to_string(), "nelly");
    }

    #[test]
    fn test_deserialize_gateway_user() {
        let raw = r#"{"id":"80351110224678912","username":"nelly","discriminator":"0","global_name":null,"avatar":"8342729096ea3675442027381ff50dfe"}"#;
        let parsed: User = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(parsed.id, UserId::new(80351110224678912));
        assert!(!parsed.bot);
        assert!(parsed.global_name.is_none());
    }
}
