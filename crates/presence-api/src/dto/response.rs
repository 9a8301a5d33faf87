//! Response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    /// Fixed liveness message.
    pub message: String,
}

/// Gateway session status as reported by `/me`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Session ready.
    Online,
    /// Not connected, or not ready yet.
    Offline,
}

/// `GET /me` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// Session status.
    pub client: ClientStatus,
    /// Display string of the connected account, if known.
    pub user: Option<String>,
}

/// `GET /activity` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    /// Activities of the tracked user, ids as strings.
    pub activities: Vec<Value>,
    /// Unix seconds of the last successful refresh.
    pub last_updated_at: i64,
}
