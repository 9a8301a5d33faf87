//! Applies dispatch events to [`GatewayState`].

use serde_json::Value;
use tracing::{debug, trace};

use presence_entity::{Message, User};

use super::store::GatewayState;
use crate::message::events::{
    RawChannel, RawPresence, RawRelationship, ReadyEvent, ReadySupplementalEvent,
    RelationshipRemoveEvent,
};

/// What a dispatch meant for the session, beyond the state it changed.
#[derive(Debug, Clone)]
pub enum Dispatched {
    /// A new session was identified. Not usable until READY_SUPPLEMENTAL.
    Ready {
        /// The connected account.
        user: User,
        /// Session ID for later resumes.
        session_id: String,
        /// Host to resume against.
        resume_gateway_url: Option<String>,
    },
    /// The supplemental presences are in and the session is ready.
    ReadySupplemental,
    /// A resumed session is ready again.
    Resumed,
    /// A message arrived.
    Message(Message),
    /// State was updated, or the event was not interesting.
    Handled,
}

/// Decode the body of a dispatch named `event` and apply it.
pub fn apply_dispatch(
    state: &GatewayState,
    event: &str,
    data: Value,
) -> Result<Dispatched, serde_json::Error> {
    match event {
        "READY" => {
            let ready: ReadyEvent = serde_json::from_value(data)?;
            let session_id = ready.session_id.clone();
            let resume_gateway_url = ready.resume_gateway_url.clone();
            let user = state.apply_ready(ready);
            Ok(Dispatched::Ready {
                user,
                session_id,
                resume_gateway_url,
            })
        }
        "READY_SUPPLEMENTAL" => {
            let supplemental: ReadySupplementalEvent = serde_json::from_value(data)?;
            let applied = state.apply_presences(supplemental.merged_presences.friends);
            debug!(presences = applied, "Applied supplemental presences");
            state.set_ready(true);
            Ok(Dispatched::ReadySupplemental)
        }
        "RESUMED" => {
            state.set_ready(true);
            Ok(Dispatched::Resumed)
        }
        "PRESENCE_UPDATE" => {
            let presence: RawPresence = serde_json::from_value(data)?;
            state.apply_presence_update(presence);
            Ok(Dispatched::Handled)
        }
        "RELATIONSHIP_ADD" | "RELATIONSHIP_UPDATE" => {
            let raw: RawRelationship = serde_json::from_value(data)?;
            let id = raw.id;
            match raw.resolve(|id| state.known_user(id)) {
                Some(relationship) => state.upsert_relationship(relationship),
                None => debug!(user_id = %id, "Relationship for unknown user ignored"),
            }
            Ok(Dispatched::Handled)
        }
        "RELATIONSHIP_REMOVE" => {
            let removed: RelationshipRemoveEvent = serde_json::from_value(data)?;
            state.remove_relationship(removed.id);
            Ok(Dispatched::Handled)
        }
        "CHANNEL_CREATE" | "CHANNEL_UPDATE" => {
            let raw: RawChannel = serde_json::from_value(data)?;
            if raw.kind.is_private() {
                state.upsert_channel(raw.resolve(|id| state.known_user(id)));
            }
            Ok(Dispatched::Handled)
        }
        "CHANNEL_DELETE" => {
            let raw: RawChannel = serde_json::from_value(data)?;
            state.remove_channel(raw.id);
            Ok(Dispatched::Handled)
        }
        "MESSAGE_CREATE" => Ok(Dispatched::Message(serde_json::from_value(data)?)),
        other => {
            trace!(event = other, "Ignoring dispatch");
            Ok(Dispatched::Handled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConnectionState;
    use presence_core::types::id::{ChannelId, UserId};
    use serde_json::json;

    fn ready_state() -> GatewayState {
        let state = GatewayState::new();
        let ready = json!({
            "user": {"id": "1", "username": "me"},
            "session_id": "abc",
            "users": [{"id": "2", "username": "friend"}],
            "private_channels": [],
            "relationships": [{"id": "2", "type": 1, "user_id": "2"}],
        });
        let dispatched = apply_dispatch(&state, "READY", ready).expect("ready");
        assert!(matches!(dispatched, Dispatched::Ready { ref session_id, .. } if session_id == "abc"));
        state
    }

    #[test]
    fn test_ready_waits_for_supplemental() {
        let state = ready_state();
        assert!(!state.is_ready());
        assert!(state.current_user().is_some());
        assert!(state.relationship(UserId::new(2)).unwrap().activities.is_empty());

        let dispatched = apply_dispatch(
            &state,
            "READY_SUPPLEMENTAL",
            json!({"merged_presences": {"friends": [
                {"user_id": "2", "status": "online", "activities": [{"name": "Chess", "type": 0}]}
            ]}}),
        )
        .unwrap();
        assert!(matches!(dispatched, Dispatched::ReadySupplemental));
        assert!(state.is_ready());
        assert_eq!(state.relationship(UserId::new(2)).unwrap().activities[0].name, "Chess");
    }

    #[test]
    fn test_supplemental_presences() {
        let state = ready_state();
        apply_dispatch(
            &state,
            "READY_SUPPLEMENTAL",
            json!({"merged_presences": {"friends": [
                {"user_id": "2", "status": "dnd", "activities": [{"name": "Code", "type": 0}]}
            ]}}),
        )
        .unwrap();
        let friend = state.relationship(UserId::new(2)).unwrap();
        assert_eq!(friend.activities[0].name, "Code");
    }

    #[test]
    fn test_channel_lifecycle() {
        let state = ready_state();
        apply_dispatch(
            &state,
            "CHANNEL_CREATE",
            json!({"id": "10", "type": 1, "recipients": [{"id": "2", "username": "friend"}]}),
        )
        .unwrap();
        assert!(state.channel(ChannelId::new(10)).is_some());

        apply_dispatch(&state, "CHANNEL_DELETE", json!({"id": "10", "type": 1})).unwrap();
        assert!(state.channel(ChannelId::new(10)).is_none());
    }

    #[test]
    fn test_relationship_remove() {
        let state = ready_state();
        apply_dispatch(&state, "RELATIONSHIP_REMOVE", json!({"id": "2", "type": 1})).unwrap();
        assert!(state.relationship(UserId::new(2)).is_none());
    }

    #[test]
    fn test_resumed_marks_ready() {
        let state = ready_state();
        state.set_ready(false);
        let dispatched = apply_dispatch(&state, "RESUMED", Value::Null).unwrap();
        assert!(matches!(dispatched, Dispatched::Resumed));
        assert!(state.is_ready());
    }

    #[test]
    fn test_message_create() {
        let state = ready_state();
        let dispatched = apply_dispatch(
            &state,
            "MESSAGE_CREATE",
            json!({
                "id": "500",
                "channel_id": "10",
                "author": {"id": "2", "username": "friend"},
                "content": "hello"
            }),
        )
        .unwrap();
        match dispatched {
            Dispatched::Message(message) => assert_eq!(message.content, "hello"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let state = ready_state();
        assert!(apply_dispatch(&state, "PRESENCE_UPDATE", json!({"activities": 5})).is_err());
        assert!(matches!(
            apply_dispatch(&state, "TYPING_START", json!({})).unwrap(),
            Dispatched::Handled
        ));
    }
}
