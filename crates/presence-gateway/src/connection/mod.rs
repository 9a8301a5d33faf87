//! Socket-level plumbing: transport setup, proxy tunnelling, heartbeats,
//! and reconnect pacing.

pub mod backoff;
pub mod heartbeat;
pub mod proxy;
pub mod transport;

pub use backoff::Backoff;
pub use heartbeat::Heartbeat;
pub use transport::{WsStream, connect};
