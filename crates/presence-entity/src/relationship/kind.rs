//! Relationship type enumeration.

use serde::{Deserialize, Serialize};

/// How the connected account relates to another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RelationshipKind {
    /// Mutual friends.
    Friend,
    /// The other user is blocked.
    Blocked,
    /// Pending friend request from the other user.
    IncomingRequest,
    /// Pending friend request to the other user.
    OutgoingRequest,
    /// Suggested or implicit relationship.
    Implicit,
    /// A type this relay does not know about.
    Other(u8),
}

impl From<u8> for RelationshipKind {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Friend,
            2 => Self::Blocked,
            3 => Self::IncomingRequest,
            4 => Self::OutgoingRequest,
            5 => Self::Implicit,
            other => Self::Other(other),
        }
    }
}

impl From<RelationshipKind> for u8 {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Friend => 1,
            RelationshipKind::Blocked => 2,
            RelationshipKind::IncomingRequest => 3,
            RelationshipKind::OutgoingRequest => 4,
            RelationshipKind::Implicit => 5,
            RelationshipKind::Other(raw) => raw,
        }
    }
}
