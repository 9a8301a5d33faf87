//! Message entity model.

use serde::{Deserialize, Serialize};

use presence_core::types::id::{ChannelId, MessageId};

use crate::user::model::User;

/// A chat message received on the gateway. Only logged by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Message author.
    pub author: User,
    /// Text content (empty without the message content intent).
    #[serde(default)]
    pub content: String,
}
