//! # presence-api
//!
//! HTTP API layer for the presence relay built on Axum.
//!
//! Read-only endpoints reporting the gateway connection and the tracked
//! user's activities, a JSON 404 fallback, and request logging.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
