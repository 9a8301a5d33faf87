//! Gateway opcode definitions.

use serde::{Deserialize, Serialize};

/// Gateway opcode carried in the `op` field of every payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OpCode {
    /// An event was dispatched.
    Dispatch,
    /// Keepalive, sent by either side.
    Heartbeat,
    /// Start a new session.
    Identify,
    /// Resume a previous session.
    Resume,
    /// The server asks us to reconnect and resume.
    Reconnect,
    /// The session was invalidated.
    InvalidSession,
    /// First payload after connecting; carries the heartbeat interval.
    Hello,
    /// Heartbeat acknowledged.
    HeartbeatAck,
    /// Any opcode this client does not handle.
    Unknown(u8),
}

impl From<u8> for OpCode {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            6 => Self::Resume,
            7 => Self::Reconnect,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => Self::Unknown(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Identify => 2,
            OpCode::Resume => 6,
            OpCode::Reconnect => 7,
            OpCode::InvalidSession => 9,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
            OpCode::Unknown(raw) => raw,
        }
    }
}
