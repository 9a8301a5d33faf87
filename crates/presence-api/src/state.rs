//! Application state shared across all handlers.

use std::sync::Arc;

use presence_cache::ActivityCache;
use presence_core::config::AppConfig;
use presence_gateway::ConnectionState;

/// Shared dependencies, passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Live gateway connection
    pub connection: Arc<dyn ConnectionState>,
    /// Activity cache for the tracked user
    pub activity_cache: Arc<ActivityCache>,
}

impl AppState {
    /// Bundle the shared dependencies.
    pub fn new(
        config: Arc<AppConfig>,
        connection: Arc<dyn ConnectionState>,
        activity_cache: Arc<ActivityCache>,
    ) -> Self {
        Self {
            config,
            connection,
            activity_cache,
        }
    }
}
