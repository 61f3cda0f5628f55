use axum::{Json, extract::State};
use igp_core::events::TelemetryEvent;
use igp_sdk::objects::StatusResponse;

use super::pushed;
use crate::api::extractors::PlayerAuth;
use crate::state::AppState;

/// `POST /logout`
pub(super) async fn logout(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
) -> Json<StatusResponse> {
    let telemetry = state
        .telemetry
        .emit(&player.id, [TelemetryEvent::Logout])
        .await;
    tracing::info!(user_id = %player.id, "Player logged out");

    Json(pushed("Logout event pushed", state.origin(), telemetry))
}
