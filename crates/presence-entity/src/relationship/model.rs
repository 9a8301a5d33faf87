//! Relationship entity model.

use serde::{Deserialize, Serialize};

use presence_core::types::id::UserId;

use super::kind::RelationshipKind;
use crate::activity::model::Activity;
use crate::user::model::User;

/// The connected account's association with another user, carrying that
/// user's latest presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// The other user's identifier.
    pub id: UserId,
    /// Relationship type.
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    /// The other user.
    pub user: User,
    /// Online status (`online`, `idle`, `dnd`, `offline`) when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Current activities, in the order the gateway reported them.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Relationship {
    /// Create a relationship with no presence data yet.
    pub fn new(kind: RelationshipKind, user: User) -> Self {
        Self {
            id: user.id,
            kind,
            user,
            status: None,
            activities: Vec::new(),
        }
    }

    /// Replace the presence portion of the relationship.
    pub fn apply_presence(&mut self, status: Option<String>, activities: Vec<Activity>) {
        self.status = status;
        self.activities = activities;
    }
}
