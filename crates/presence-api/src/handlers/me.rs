//! Connected account handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ClientStatus, MeResponse};
use crate::state::AppState;

/// GET /me
///
/// Reports whether the gateway session is ready and which account it is
/// logged in as. The account stays known across reconnects.
pub async fn me(State(state): State<AppState>) -> Json<MeResponse> {
    let client = if state.connection.is_ready() {
        ClientStatus::Online
    } else {
        ClientStatus::Offline
    };

    Json(MeResponse {
        client,
        user: state.connection.current_user().map(|u| u.to_string()),
    })
}
