//! Built-in handler that logs gateway events.

use async_trait::async_trait;
use tracing::{error, info};

use presence_entity::{Message, User};

use super::EventHandler;
use crate::error::GatewayError;

/// Logs logins, incoming messages, and handler errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

#[async_trait]
impl EventHandler for LoggingHandler {
    fn name(&self) -> &str {
        "logging"
    }

    async fn on_ready(&self, user: &User) {
        info!(user_id = %user.id, "Discord client logged in as {user}");
    }

    async fn on_message(&self, message: &Message) {
        info!(
            channel_id = %message.channel_id,
            author = %message.author,
            "Received message: {}",
            message.content
        );
    }

    async fn on_error(&self, event: &str, err: &GatewayError) {
        error!(event = %event, error = %err, "Error while handling gateway event");
    }
}
