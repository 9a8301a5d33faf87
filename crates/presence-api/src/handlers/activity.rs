//! Activity handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::ActivityResponse;
use crate::state::AppState;

/// GET /activity
///
/// Never fails: an unavailable connection or unresolved user yields an
/// empty list with the previous refresh time.
pub async fn activity(State(state): State<AppState>) -> Json<ActivityResponse> {
    let report = state.activity_cache.activities();
    Json(ActivityResponse {
        activities: report.activities,
        last_updated_at: report.last_updated_at,
    })
}
