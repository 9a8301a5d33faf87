//! Fallbacks for unknown paths and methods.

use axum::Json;
use axum::http::StatusCode;

use presence_core::error::AppError;

use crate::error::{ApiError, ErrorResponse};

/// Any path without a route.
pub async fn not_found() -> ApiError {
    AppError::not_found("Not Found").into()
}

/// A known path requested with the wrong method.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            detail: "Method Not Allowed".to_string(),
        }),
    )
}
