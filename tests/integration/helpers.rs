//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use presence_cache::ActivityCache;
use presence_core::config::AppConfig;
use presence_core::traits::ManualClock;
use presence_core::types::id::ChannelId;
use presence_gateway::state::apply_dispatch;
use presence_gateway::{ConnectionState, GatewayState};

/// Tracked DM channel used by every test.
pub const CHANNEL_ID: u64 = 10;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Gateway state behind the router
    pub gateway: Arc<GatewayState>,
    /// Clock driving the activity cache
    pub clock: Arc<ManualClock>,
}

/// Status and decoded body of a test request.
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// JSON body
    pub body: Value,
}

impl TestApp {
    /// Create a test application with a disconnected gateway at t=1000.
    pub fn new() -> Self {
        let config = AppConfig::default();
        let gateway = Arc::new(GatewayState::new());
        let clock = Arc::new(ManualClock::at_epoch_seconds(1000));
        let connection: Arc<dyn ConnectionState> = gateway.clone();

        let cache = Arc::new(ActivityCache::new(
            Arc::clone(&connection),
            clock.clone(),
            Some(ChannelId::new(CHANNEL_ID)),
            chrono::TimeDelta::seconds(30),
        ));

        let state = presence_api::AppState::new(Arc::new(config), connection, cache);
        let router = presence_api::build_app(state);

        Self {
            router,
            gateway,
            clock,
        }
    }

    /// Feed READY and READY_SUPPLEMENTAL; the friend is doing `activities`.
    pub fn connect(&self, activities: Value) {
        self.identify();
        self.supplemental(activities);
    }

    /// Feed a READY for account `me#1234` with friend `2` in DM channel 10.
    /// The session is not ready until [`supplemental`](Self::supplemental).
    pub fn identify(&self) {
        let ready = json!({
            "user": {"id": "1", "username": "me", "discriminator": "1234"},
            "session_id": "session",
            "users": [{"id": "2", "username": "friend", "discriminator": "0"}],
            "private_channels": [{"id": CHANNEL_ID.to_string(), "type": 1, "recipient_ids": ["2"]}],
            "relationships": [{"id": "2", "type": 1, "user_id": "2"}],
        });
        apply_dispatch(&self.gateway, "READY", ready).expect("READY applies");
    }

    /// Feed a READY_SUPPLEMENTAL carrying the friend's presence.
    pub fn supplemental(&self, activities: Value) {
        let supplemental = json!({"merged_presences": {"friends": [
            {"user_id": "2", "status": "online", "activities": activities}
        ]}});
        apply_dispatch(&self.gateway, "READY_SUPPLEMENTAL", supplemental)
            .expect("READY_SUPPLEMENTAL applies");
    }

    /// Feed a PRESENCE_UPDATE for the friend.
    pub fn presence(&self, activities: Value) {
        let update = json!({"user": {"id": "2"}, "status": "online", "activities": activities});
        apply_dispatch(&self.gateway, "PRESENCE_UPDATE", update).expect("presence applies");
    }

    /// Send a request and decode the JSON body.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// GET shorthand.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }
}
