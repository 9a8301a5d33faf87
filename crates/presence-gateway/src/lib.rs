//! # presence-gateway
//!
//! Discord gateway client for the presence relay. Provides:
//!
//! - In-memory connection state (readiness, current user, private
//!   channels, relationships with live activities) behind the
//!   [`ConnectionState`] trait
//! - Gateway wire protocol (opcodes, payloads, dispatch events)
//! - Heartbeating, reconnect with resume, exponential backoff
//! - Optional HTTP CONNECT proxy tunnelling
//! - Named event handlers invoked from the client's event loop

pub mod client;
pub mod connection;
pub mod error;
pub mod handler;
pub mod message;
pub mod state;

pub use client::GatewayClient;
pub use error::GatewayError;
pub use handler::{EventHandler, HandlerRegistry, LoggingHandler};
pub use state::{ConnectionState, GatewayState};
