//! Route definitions for the presence relay HTTP API.

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route, the JSON fallbacks, and request
/// logging, threaded with `state`.
pub fn build_router(state: AppState) -> Router {
    let logging = axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::logging::request_logging,
    );

    Router::new()
        .route("/", get(handlers::root::root))
        .route("/me", get(handlers::me::me))
        .route("/activity", get(handlers::activity::activity))
        .fallback(handlers::fallback::not_found)
        .method_not_allowed_fallback(handlers::fallback::method_not_allowed)
        .layer(logging)
        .with_state(state)
}
