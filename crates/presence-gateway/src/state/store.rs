//! Concurrent tables backing [`ConnectionState`].

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::{debug, info};

use presence_core::types::id::{ChannelId, UserId};
use presence_entity::{Channel, Relationship, User};

use super::ConnectionState;
use crate::message::events::{RawPresence, ReadyEvent};

/// Readiness flag, current user, and the private channel and relationship
/// tables of one gateway session.
#[derive(Debug, Default)]
pub struct GatewayState {
    ready: AtomicBool,
    user: RwLock<Option<User>>,
    /// User ID → user, from READY and later events
    users: DashMap<UserId, User>,
    /// Channel ID → private channel
    channels: DashMap<ChannelId, Channel>,
    /// User ID → relationship with live presence
    relationships: DashMap<UserId, Relationship>,
}

impl GatewayState {
    /// Create an empty, not-ready state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with the contents of a READY payload. Returns the
    /// connected account.
    ///
    /// The state stays not ready: friend presences of user accounts arrive in
    /// READY_SUPPLEMENTAL, and until then every relationship looks idle.
    pub fn apply_ready(&self, ready: ReadyEvent) -> User {
        self.clear_tables();

        for user in ready.users {
            self.users.insert(user.id, user);
        }
        self.users.insert(ready.user.id, ready.user.clone());

        for raw in ready.private_channels {
            if !raw.kind.is_private() {
                continue;
            }
            let channel = raw.resolve(|id| self.known_user(id));
            for recipient in &channel.recipients {
                self.users.insert(recipient.id, recipient.clone());
            }
            self.channels.insert(channel.id, channel);
        }

        for raw in ready.relationships {
            if let Some(relationship) = raw.resolve(|id| self.known_user(id)) {
                self.users
                    .insert(relationship.user.id, relationship.user.clone());
                self.relationships.insert(relationship.id, relationship);
            }
        }

        let applied = self.apply_presences(ready.presences);

        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(ready.user.clone());

        info!(
            user = %ready.user,
            channels = self.channels.len(),
            relationships = self.relationships.len(),
            presences = applied,
            "Gateway state populated from READY"
        );

        ready.user
    }

    /// Apply a batch of presences. Returns how many matched a relationship.
    pub fn apply_presences(&self, presences: Vec<RawPresence>) -> usize {
        presences
            .into_iter()
            .filter(|presence| self.apply_presence_update(presence.clone()))
            .count()
    }

    /// Replace the status and activities of the matching relationship.
    ///
    /// Returns `false` when the presence belongs to nobody we track.
    pub fn apply_presence_update(&self, presence: RawPresence) -> bool {
        let Some(user_id) = presence.user_id() else {
            return false;
        };
        match self.relationships.get_mut(&user_id) {
            Some(mut relationship) => {
                debug!(
                    user_id = %user_id,
                    activities = presence.activities.len(),
                    "Presence updated"
                );
                relationship.apply_presence(presence.status, presence.activities);
                true
            }
            None => false,
        }
    }

    /// Insert or replace a relationship, keeping known activities on update.
    pub fn upsert_relationship(&self, mut relationship: Relationship) {
        if let Some(existing) = self.relationships.get(&relationship.id) {
            if relationship.activities.is_empty() && relationship.status.is_none() {
                relationship.status = existing.status.clone();
                relationship.activities = existing.activities.clone();
            }
        }
        self.users
            .insert(relationship.user.id, relationship.user.clone());
        self.relationships.insert(relationship.id, relationship);
    }

    /// Drop a relationship.
    pub fn remove_relationship(&self, user_id: UserId) -> Option<Relationship> {
        self.relationships.remove(&user_id).map(|(_, r)| r)
    }

    /// Insert or replace a private channel. Other kinds are ignored.
    pub fn upsert_channel(&self, channel: Channel) -> bool {
        if !channel.kind.is_private() {
            return false;
        }
        for recipient in &channel.recipients {
            self.users.insert(recipient.id, recipient.clone());
        }
        self.channels.insert(channel.id, channel);
        true
    }

    /// Drop a channel.
    pub fn remove_channel(&self, id: ChannelId) -> Option<Channel> {
        self.channels.remove(&id).map(|(_, c)| c)
    }

    /// A user seen anywhere in this session.
    pub fn known_user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|r| r.value().clone())
    }

    /// Flip the readiness flag.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Forget the session entirely.
    pub fn reset(&self) {
        self.set_ready(false);
        self.clear_tables();
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn clear_tables(&self) {
        self.users.clear();
        self.channels.clear();
        self.relationships.clear();
    }
}

impl ConnectionState for GatewayState {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn channel(&self, id: ChannelId) -> Option<Channel> {
        self.channels.get(&id).map(|r| r.value().clone())
    }

    fn relationship(&self, user_id: UserId) -> Option<Relationship> {
        self.relationships.get(&user_id).map(|r| r.value().clone())
    }
}
