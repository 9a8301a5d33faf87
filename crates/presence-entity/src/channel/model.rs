//! Private channel entity model.

use serde::{Deserialize, Serialize};

use presence_core::types::id::ChannelId;

use super::kind::ChannelKind;
use crate::user::model::User;

/// A private (DM or group DM) channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique channel identifier.
    pub id: ChannelId,
    /// Channel type.
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// Other participants, excluding the connected account.
    #[serde(default)]
    pub recipients: Vec<User>,
}

impl Channel {
    /// The other participant of a one-to-one DM.
    ///
    /// Group DMs and guild channels have no single recipient.
    pub fn recipient(&self) -> Option<&User> {
        match self.kind {
            ChannelKind::Dm => self.recipients.first(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_core::types::id::UserId;

    fn member(id: u64) -> User {
        User {
            id: UserId::new(id),
            username: format!("user{id}"),
            discriminator: None,
            global_name: None,
            bot: false,
        }
    }

    #[test]
    fn test_dm_recipient() {
        let channel = Channel {
            id: ChannelId::new(10),
            kind: ChannelKind::Dm,
            recipients: vec![member(7)],
        };
        assert_eq!(channel.recipient().map(|u| u.id), Some(UserId::new(7)));
    }

    #[test]
    fn test_group_dm_has_no_single_recipient() {
        let channel = Channel {
            id: ChannelId::new(10),
            kind: ChannelKind::GroupDm,
            recipients: vec![member(7), member(8)],
        };
        assert!(channel.recipient().is_none());
    }

    #[test]
    fn test_kind_roundtrips_through_u8() {
        let parsed: Channel =
            serde_json::from_str(r#"{"id":"10","type":3,"recipients":[]}"#).expect("deserialize");
        assert_eq!(parsed.kind, ChannelKind::GroupDm);
        assert_eq!(ChannelKind::from(0), ChannelKind::Other(0));
        assert!(!ChannelKind::Other(0).is_private());
        let json = serde_json::to_value(&parsed).expect("serialize");
        assert_eq!(json["type"], 3);
    }
}
