//! Channel type enumeration.

use serde::{Deserialize, Serialize};

/// Gateway channel type. Only private channel kinds are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelKind {
    /// One-to-one direct message channel.
    Dm,
    /// Group direct message channel.
    GroupDm,
    /// Any other channel type (guild text, voice, threads, ...).
    Other(u8),
}

impl ChannelKind {
    /// Whether the channel lives outside any guild.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }
}

impl From<u8> for ChannelKind {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Dm,
            3 => Self::GroupDm,
            other => Self::Other(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Dm => 1,
            ChannelKind::GroupDm => 3,
            ChannelKind::Other(raw) => raw,
        }
    }
}
