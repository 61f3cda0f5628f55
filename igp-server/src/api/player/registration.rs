use axum::{Json, extract::State, http::HeaderMap};
use igp_core::events::{RegistrationEvent, TelemetryEvent};
use igp_sdk::objects::StatusResponse;

use super::{pushed, user_agent};
use crate::api::extractors::PlayerAuth;
use crate::state::AppState;

/// `POST /registration`: tell FT the player has signed up.
pub(super) async fn registration(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
    headers: HeaderMap,
) -> Json<StatusResponse> {
    let event = RegistrationEvent {
        user_agent: user_agent(&headers),
        ..RegistrationEvent::default()
    };
    let telemetry = state
        .telemetry
        .emit(&player.id, [TelemetryEvent::Registration(event)])
        .await;

    Json(pushed(
        "Registration event pushed",
        state.origin(),
        telemetry,
    ))
}
