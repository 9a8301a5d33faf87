//! Liveness handler.

use axum::Json;

use crate::dto::response::RootResponse;

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Server is running!".to_string(),
    })
}
