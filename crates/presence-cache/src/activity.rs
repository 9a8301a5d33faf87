//! The activity cache.

use std::sync::{Arc, Mutex};

use chrono::TimeDelta;
use serde_json::Value;
use tracing::{debug, info, warn};

use presence_core::traits::Clock;
use presence_core::types::id::ChannelId;
use presence_entity::User;
use presence_gateway::ConnectionState;

use crate::state::CacheState;

/// Activities of the tracked user and when they were fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    /// Activities in the order the gateway reported them.
    pub activities: Vec<Value>,
    /// Unix seconds of the last successful refresh.
    pub last_updated_at: i64,
}

/// TTL-bounded view of the tracked user's activities.
///
/// Failures never surface as errors: when the connection is not ready, the
/// channel cannot be resolved, or there is no relationship with the
/// recipient, the report is empty and carries the previous refresh time, so
/// the next call retries immediately.
#[derive(Debug)]
pub struct ActivityCache {
    connection: Arc<dyn ConnectionState>,
    clock: Arc<dyn Clock>,
    channel_id: Option<ChannelId>,
    ttl: TimeDelta,
    state: Mutex<CacheState>,
}

impl ActivityCache {
    /// Create a cache reading from `connection`, tracking the recipient of
    /// `channel_id`, and refreshing at most once per `ttl`.
    pub fn new(
        connection: Arc<dyn ConnectionState>,
        clock: Arc<dyn Clock>,
        channel_id: Option<ChannelId>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            connection,
            clock,
            channel_id,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The resolved recipient, if resolution has succeeded.
    pub fn recipient(&self) -> Option<User> {
        self.lock().recipient.clone()
    }

    /// Current activities of the tracked user.
    pub fn activities(&self) -> ActivityReport {
        let now = self.clock.now();
        let mut state = self.lock();

        if let Some(snapshot) = state.fresh_snapshot(now, self.ttl) {
            debug!(
                age_ms = (now - state.last_refresh).num_milliseconds(),
                "Serving cached activities"
            );
            return ActivityReport {
                activities: snapshot.to_vec(),
                last_updated_at: state.last_refresh.timestamp(),
            };
        }

        let empty = ActivityReport {
            activities: Vec::new(),
            last_updated_at: state.last_refresh.timestamp(),
        };

        if !self.connection.is_ready() {
            warn!("Discord client is not ready");
            return empty;
        }

        let recipient = match state.recipient.clone() {
            Some(recipient) => recipient,
            None => match self.resolve_recipient() {
                Some(recipient) => {
                    info!(recipient = %recipient, user_id = %recipient.id, "Resolved tracked user");
                    state.recipient = Some(recipient.clone());
                    recipient
                }
                None => return empty,
            },
        };

        let Some(relationship) = self.connection.relationship(recipient.id) else {
            warn!(user_id = %recipient.id, "Relationship not found");
            return empty;
        };

        let activities: Vec<Value> = relationship.activities.iter().map(|a| a.to_json()).collect();
        info!(
            user_id = %recipient.id,
            count = activities.len(),
            "Refreshed activities"
        );
        state.store(activities.clone(), now);

        ActivityReport {
            activities,
            last_updated_at: now.timestamp(),
        }
    }

    fn resolve_recipient(&self) -> Option<User> {
        let Some(channel_id) = self.channel_id else {
            warn!("No channel configured for the tracked user");
            return None;
        };
        let Some(channel) = self.connection.channel(channel_id) else {
            warn!(channel_id = %channel_id, "Channel not found");
            return None;
        };
        match channel.recipient() {
            Some(user) => Some(user.clone()),
            None => {
                warn!(channel_id = %channel_id, "No recipient ID found");
                None
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
