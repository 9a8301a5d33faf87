//! Request logging with the gateway state at the time of the request.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::state::AppState;

/// Logs method, path, status and duration, plus `gateway_ready` as seen when
/// the request arrived. Presence endpoints answer 200 with empty data while
/// the gateway is down.
pub async fn request_logging(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let gateway_ready = state.connection.is_ready();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, %path, status, duration_ms, gateway_ready, "HTTP request failed");
    } else {
        info!(%method, %path, status, duration_ms, gateway_ready, "HTTP request");
    }

    response
}
