//! Gateway close code classification.

use crate::error::GatewayError;

/// What to do after the gateway closed the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Reconnect and resume the existing session.
    Resume,
    /// Reconnect with a fresh Identify.
    Reidentify,
}

/// Token rejected.
pub const AUTHENTICATION_FAILED: u16 = 4004;
/// Resume sent with a bad sequence number.
pub const INVALID_SEQUENCE: u16 = 4007;
/// Session timed out.
pub const SESSION_TIMED_OUT: u16 = 4009;

/// Classify a close code. Fatal codes become errors.
pub fn classify(code: u16, reason: &str) -> Result<CloseAction, GatewayError> {
    match code {
        AUTHENTICATION_FAILED => Err(GatewayError::AuthenticationFailed {
            reason: reason.to_string(),
        }),
        // invalid shard, sharding required, invalid API version,
        // invalid intents, disallowed intents
        4010..=4014 => Err(GatewayError::FatalClose {
            code,
            reason: reason.to_string(),
        }),
        INVALID_SEQUENCE | SESSION_TIMED_OUT => Ok(CloseAction::Reidentify),
        _ => Ok(CloseAction::Resume),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failure_is_fatal() {
        let err = classify(4004, "Authentication failed.").unwrap_err();
        assert!(matches!(err, GatewayError::AuthenticationFailed { .. }));
    }

    #[test]
    fn test_intent_errors_are_fatal() {
        assert!(classify(4013, "").is_err());
        assert!(classify(4014, "").is_err());
    }

    #[test]
    fn test_session_loss_reidentifies() {
        assert_eq!(classify(4007, "").unwrap(), CloseAction::Reidentify);
        assert_eq!(classify(4009, "").unwrap(), CloseAction::Reidentify);
    }

    #[test]
    fn test_other_codes_resume() {
        assert_eq!(classify(1001, "going away").unwrap(), CloseAction::Resume);
        assert_eq!(classify(4000, "unknown").unwrap(), CloseAction::Resume);
    }
}
