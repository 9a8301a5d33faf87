//! Gateway payload envelope and outbound command builders.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::opcode::OpCode;

/// Every gateway frame: `{ "op": .., "d": .., "s": .., "t": .. }`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPayload {
    /// Opcode.
    pub op: OpCode,
    /// Event data.
    #[serde(default)]
    pub d: Value,
    /// Sequence number, present on dispatches.
    #[serde(default)]
    pub s: Option<u64>,
    /// Event name, present on dispatches.
    #[serde(default)]
    pub t: Option<String>,
}

/// Data of the Hello payload.
#[derive(Debug, Clone, Deserialize)]
pub struct HelloData {
    /// Milliseconds between heartbeats.
    pub heartbeat_interval: u64,
}

#[derive(Serialize)]
struct Outbound<T: Serialize> {
    op: OpCode,
    d: T,
}

fn encode<T: Serialize>(op: OpCode, d: T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Outbound { op, d })
}

/// Heartbeat carrying the last sequence number seen.
pub fn heartbeat(sequence: Option<u64>) -> Result<String, serde_json::Error> {
    encode(OpCode::Heartbeat, sequence)
}

/// Identify for a new session.
pub fn identify(token: &str, intents: Option<u64>) -> Result<String, serde_json::Error> {
    let mut data = json!({
        "token": token,
        "properties": {
            "os": std::env::consts::OS,
            "browser": "presence-relay",
            "device": "presence-relay",
        },
        "compress": false,
    });
    if let (Some(intents), Some(map)) = (intents, data.as_object_mut()) {
        map.insert("intents".to_string(), json!(intents));
    }
    encode(OpCode::Identify, data)
}

/// Resume an interrupted session.
pub fn resume(
    token: &str,
    session_id: &str,
    sequence: Option<u64>,
) -> Result<String, serde_json::Error> {
    encode(
        OpCode::Resume,
        json!({
            "token": token,
            "session_id": session_id,
            "seq": sequence,
        }),
    )
}
