//! Mutable portion of the activity cache.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use presence_entity::User;

/// Snapshot, refresh time, and resolved recipient.
#[derive(Debug, Clone)]
pub struct CacheState {
    /// Last successfully fetched activities. `None` until the first refresh.
    pub snapshot: Option<Vec<Value>>,
    /// When `snapshot` was fetched. The Unix epoch until the first refresh.
    pub last_refresh: DateTime<Utc>,
    /// The tracked user, once resolved. Never cleared.
    pub recipient: Option<User>,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            snapshot: None,
            last_refresh: DateTime::UNIX_EPOCH,
            recipient: None,
        }
    }
}

impl CacheState {
    /// The stored snapshot, if one exists and is younger than `ttl` at `now`.
    pub fn fresh_snapshot(&self, now: DateTime<Utc>, ttl: TimeDelta) -> Option<&[Value]> {
        match &self.snapshot {
            Some(snapshot) if now - self.last_refresh < ttl => Some(snapshot),
            _ => None,
        }
    }

    /// Replace the snapshot and its refresh time together.
    pub fn store(&mut self, snapshot: Vec<Value>, now: DateTime<Utc>) {
        self.snapshot = Some(snapshot);
        self.last_refresh = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::UNIX_EPOCH + TimeDelta::seconds(seconds)
    }

    #[test]
    fn test_initial_state_is_never_fresh() {
        let state = CacheState::default();
        assert_eq!(state.last_refresh.timestamp(), 0);
        assert!(state.fresh_snapshot(at(0), TimeDelta::seconds(30)).is_none());
    }

    #[test]
    fn test_freshness_is_strict() {
        let mut state = CacheState::default();
        state.store(vec![json!({"name": "Chess"})], at(100));
        let ttl = TimeDelta::seconds(30);
        assert!(state.fresh_snapshot(at(129), ttl).is_some());
        assert!(state.fresh_snapshot(at(130), ttl).is_none());
    }

    #[test]
    fn test_empty_snapshot_can_be_fresh() {
        let mut state = CacheState::default();
        state.store(Vec::new(), at(10));
        assert_eq!(state.fresh_snapshot(at(11), TimeDelta::seconds(30)), Some(&[][..]));
    }
}
