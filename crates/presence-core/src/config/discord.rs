//! Discord gateway connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::id::ChannelId;

/// Discord gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Account token used to identify on the gateway.
    #[serde(default)]
    pub token: Option<String>,
    /// DM channel whose recipient is the tracked user.
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    /// Gateway WebSocket URL including version and encoding.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Gateway intents bitfield. Omitted from Identify when unset.
    #[serde(default)]
    pub intents: Option<u64>,
    /// Timeout for the TCP, proxy, TLS, and WebSocket handshakes.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// First delay between reconnect attempts.
    #[serde(default = "default_reconnect_initial")]
    pub reconnect_initial_delay_ms: u64,
    /// Ceiling for the exponential reconnect delay.
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_delay_ms: u64,
    /// How long to wait for READY_SUPPLEMENTAL after READY before the
    /// session is marked ready anyway.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            channel_id: None,
            gateway_url: default_gateway_url(),
            intents: None,
            connect_timeout_seconds: default_connect_timeout(),
            reconnect_initial_delay_ms: default_reconnect_initial(),
            reconnect_max_delay_ms: default_reconnect_max(),
            ready_timeout_ms: default_ready_timeout(),
        }
    }
}

/// Validated values the gateway client cannot start without.
#[derive(Debug, Clone)]
pub struct GatewayCredentials {
    /// Account token.
    pub token: String,
    /// Tracked DM channel.
    pub channel_id: ChannelId,
}

impl GatewayCredentials {
    /// First eight characters of the token, safe to log.
    pub fn token_prefix(&self) -> &str {
        let end = self
            .token
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.token.len());
        &self.token[..end]
    }
}

impl DiscordConfig {
    /// Return the token and channel ID, or a configuration error naming
    /// what is missing.
    pub fn credentials(&self) -> AppResult<GatewayCredentials> {
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match (token, self.channel_id) {
            (Some(token), Some(channel_id)) => Ok(GatewayCredentials {
                token: token.to_string(),
                channel_id,
            }),
            _ => Err(AppError::configuration(
                "`DISCORD_TOKEN` and `DISCORD_CHANNEL_ID` must be set in environment variables",
            )),
        }
    }
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_reconnect_initial() -> u64 {
    1000
}

fn default_reconnect_max() -> u64 {
    60_000
}

fn default_ready_timeout() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_token_and_channel() {
        let mut config = DiscordConfig::default();
        assert!(config.credentials().is_err());

        config.token = Some("   ".to_string());
        config.channel_id = Some(ChannelId::new(1));
        assert!(config.credentials().is_err());

        config.token = Some("MTIzNDU2Nzg5.abc.def".to_string());
        let creds = config.credentials().expect("valid");
        assert_eq!(creds.channel_id, ChannelId::new(1));
        assert_eq!(creds.token_prefix(), "MTIzNDU2");
    }

    #[test]
    fn test_short_token_prefix() {
        let creds = GatewayCredentials {
            token: "abc".to_string(),
            channel_id: ChannelId::new(1),
        };
        assert_eq!(creds.token_prefix(), "abc");
    }
}
