//! Dispatch event bodies as sent by the gateway.
//!
//! These are raw wire shapes. User accounts receive either embedded user
//! objects or bare IDs that point into the READY `users` list, so the raw
//! types keep both forms and resolve them through a lookup.

use serde::Deserialize;

use presence_core::types::id::{ChannelId, UserId};
use presence_entity::{Activity, Channel, ChannelKind, Relationship, RelationshipKind, User};

/// READY: first dispatch of a new session.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyEvent {
    /// The connected account.
    pub user: User,
    /// Session to resume after a disconnect.
    pub session_id: String,
    /// Host to use when resuming.
    #[serde(default)]
    pub resume_gateway_url: Option<String>,
    /// Users referenced by ID elsewhere in the payload.
    #[serde(default)]
    pub users: Vec<User>,
    /// DM and group DM channels.
    #[serde(default)]
    pub private_channels: Vec<RawChannel>,
    /// Friends, blocks, and pending requests.
    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
    /// Presences of related users, when sent inline.
    #[serde(default)]
    pub presences: Vec<RawPresence>,
}

/// READY_SUPPLEMENTAL: presences that did not fit into READY.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadySupplementalEvent {
    /// Presences grouped by source.
    #[serde(default)]
    pub merged_presences: MergedPresences,
}

/// Presence groups inside READY_SUPPLEMENTAL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergedPresences {
    /// Presences of friends.
    #[serde(default)]
    pub friends: Vec<RawPresence>,
}

/// A private channel as sent by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChannel {
    /// Channel ID.
    pub id: ChannelId,
    /// Channel type.
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// Embedded recipients.
    #[serde(default)]
    pub recipients: Vec<User>,
    /// Recipient IDs, used instead of `recipients` by newer READY payloads.
    #[serde(default)]
    pub recipient_ids: Vec<UserId>,
}

impl RawChannel {
    /// Resolve into a channel, looking up bare recipient IDs.
    pub fn resolve(self, lookup: impl Fn(UserId) -> Option<User>) -> Channel {
        let recipients = if self.recipients.is_empty() {
            self.recipient_ids.into_iter().filter_map(lookup).collect()
        } else {
            self.recipients
        };
        Channel {
            id: self.id,
            kind: self.kind,
            recipients,
        }
    }
}

/// A relationship as sent by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationship {
    /// The other user's ID.
    pub id: UserId,
    /// Relationship type.
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    /// Embedded user object.
    #[serde(default)]
    pub user: Option<User>,
    /// Bare user ID, used instead of `user` by newer READY payloads.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl RawRelationship {
    /// Resolve into a relationship. `None` if the user cannot be found.
    pub fn resolve(self, lookup: impl Fn(UserId) -> Option<User>) -> Option<Relationship> {
        let user = match self.user {
            Some(user) => user,
            None => lookup(self.user_id.unwrap_or(self.id))?,
        };
        Some(Relationship::new(self.kind, user))
    }
}

/// Only the ID of a user is guaranteed in presence payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct PartialUser {
    /// User ID.
    pub id: UserId,
}

/// A presence as sent in PRESENCE_UPDATE and in READY presence lists.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPresence {
    /// Partial user (PRESENCE_UPDATE, READY `presences`).
    #[serde(default)]
    pub user: Option<PartialUser>,
    /// Bare user ID (READY_SUPPLEMENTAL).
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Online status.
    #[serde(default)]
    pub status: Option<String>,
    /// Current activities.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl RawPresence {
    /// The user this presence belongs to.
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id).or(self.user_id)
    }
}

/// RELATIONSHIP_REMOVE body.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipRemoveEvent {
    /// The other user's ID.
    pub id: UserId,
}
