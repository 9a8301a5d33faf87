//! Named event handlers invoked from the gateway client's event loop.

pub mod logging;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use presence_entity::{Message, User};

use crate::error::GatewayError;

pub use logging::LoggingHandler;

/// Reacts to gateway lifecycle events. Every callback defaults to a no-op.
#[async_trait]
pub trait EventHandler: Send + Sync + std::fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// A session became ready.
    async fn on_ready(&self, _user: &User) {}

    /// A message was received.
    async fn on_message(&self, _message: &Message) {}

    /// Something went wrong while handling `event`.
    async fn on_error(&self, _event: &str, _error: &GatewayError) {}
}

/// Registered handlers, called in registration order.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler.
    pub async fn register(&self, handler: Arc<dyn EventHandler>) {
        let name = handler.name().to_string();
        self.handlers.write().await.push(handler);
        info!(handler = %name, "Event handler registered");
    }

    /// Number of registered handlers.
    pub async fn len(&self) -> usize {
        self.handlers.read().await.len()
    }

    /// Whether no handler is registered.
    pub async fn is_empty(&self) -> bool {
        self.handlers.read().await.is_empty()
    }

    async fn snapshot(&self) -> Vec<Arc<dyn EventHandler>> {
        self.handlers.read().await.clone()
    }

    pub(crate) async fn dispatch_ready(&self, user: &User) {
        for handler in self.snapshot().await {
            handler.on_ready(user).await;
        }
    }

    pub(crate) async fn dispatch_message(&self, message: &Message) {
        for handler in self.snapshot().await {
            handler.on_message(message).await;
        }
    }

    pub(crate) async fn dispatch_error(&self, event: &str, error: &GatewayError) {
        for handler in self.snapshot().await {
            handler.on_error(event, error).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use presence_core::types::id::{ChannelId, MessageId, UserId};

    #[derive(Debug, Default)]
    struct Counting {
        ready: AtomicUsize,
        messages: AtomicUsize,
        errors: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn on_ready(&self, _user: &User) {
            self.ready.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_message(&self, _message: &Message) {
            self.messages.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_error(&self, _event: &str, _error: &GatewayError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    struct Silent;

    #[async_trait]
    impl EventHandler for Silent {
        fn name(&self) -> &str {
            "silent"
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(1),
            username: "me".to_string(),
            discriminator: None,
            global_name: None,
            bot: false,
        }
    }

    #[tokio::test]
    async fn test_dispatch_reaches_every_handler() {
        let registry = HandlerRegistry::new();
        let counting = Arc::new(Counting::default());
        registry.register(counting.clone()).await;
        registry.register(Arc::new(Silent)).await;
        assert_eq!(registry.len().await, 2);

        let message = Message {
            id: MessageId::new(5),
            channel_id: ChannelId::new(6),
            author: user(),
            content: "hi".to_string(),
        };
        registry.dispatch_ready(&user()).await;
        registry.dispatch_message(&message).await;
        registry
            .dispatch_error("PRESENCE_UPDATE", &GatewayError::Protocol("bad".into()))
            .await;

        assert_eq!(counting.ready.load(Ordering::SeqCst), 1);
        assert_eq!(counting.messages.load(Ordering::SeqCst), 1);
        assert_eq!(counting.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty().await);
        registry.dispatch_ready(&user()).await;
    }
}
