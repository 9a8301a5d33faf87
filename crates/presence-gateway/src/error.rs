//! Error type for the gateway client.
//!
//! All transport, protocol, and decoding failures are consolidated into
//! [`GatewayError`], which maps onto `presence_core::error::AppError`.

use presence_core::error::{AppError, ErrorKind};
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Unified error type for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Socket-level failure (TCP connect, proxy I/O).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket or TLS failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),

    /// A payload could not be decoded or encoded.
    #[error("Payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The gateway URL could not be used.
    #[error("Invalid gateway URL '{0}'")]
    InvalidUrl(String),

    /// The proxy refused or mangled the CONNECT tunnel.
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// A handshake step did not finish in time.
    #[error("Timed out during {0}")]
    Timeout(&'static str),

    /// The gateway sent something we did not expect.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The gateway rejected the token (close code 4004).
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Close reason sent by the gateway.
        reason: String,
    },

    /// The gateway closed the connection with a non-recoverable code.
    #[error("Gateway closed the connection with code {code}: {reason}")]
    FatalClose {
        /// Close code.
        code: u16,
        /// Close reason.
        reason: String,
    },
}

impl From<tungstenite::Error> for GatewayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

impl GatewayError {
    /// Whether retrying the connection cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::FatalClose { .. } | Self::InvalidUrl(_)
        )
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let kind = match &err {
            GatewayError::AuthenticationFailed { .. } => ErrorKind::Authentication,
            GatewayError::InvalidUrl(_) => ErrorKind::Configuration,
            GatewayError::Decode(_) => ErrorKind::Serialization,
            GatewayError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Gateway,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(GatewayError::AuthenticationFailed { reason: "bad".into() }.is_fatal());
        assert!(GatewayError::FatalClose { code: 4014, reason: String::new() }.is_fatal());
        assert!(!GatewayError::Timeout("hello").is_fatal());
        assert!(!GatewayError::Protocol("odd".into()).is_fatal());
    }

    #[test]
    fn test_maps_to_app_error_kind() {
        let err: AppError = GatewayError::AuthenticationFailed { reason: "bad".into() }.into();
        assert_eq!(err.kind, ErrorKind::Authentication);
        let err: AppError = GatewayError::Timeout("connect").into();
        assert_eq!(err.kind, ErrorKind::Gateway);
    }
}
