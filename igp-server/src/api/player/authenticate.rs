use axum::{Json, extract::State, http::HeaderMap};
use igp_core::entities::User;
use igp_core::events::{LoginEvent, TelemetryEvent};
use igp_core::processors::balance_event;
use igp_sdk::objects::TelemetryRecord;
use serde::Serialize;
use time::OffsetDateTime;

use super::user_agent;
use crate::api::extractors::PlayerAuth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub(super) struct AuthenticateResponse {
    sid: String,
    user: User,
    currency: String,
    origin: String,
    #[serde(rename = "_telemetry")]
    telemetry: Vec<TelemetryRecord>,
}

/// `POST /authenticate`: open a dashboard session.
///
/// Sends `login` followed by the current `balance` to FT.
pub(super) async fn authenticate(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
    headers: HeaderMap,
) -> Json<AuthenticateResponse> {
    let login = LoginEvent {
        user_agent: user_agent(&headers),
        ..LoginEvent::default()
    };
    let telemetry = state
        .telemetry
        .emit(
            &player.id,
            [TelemetryEvent::Login(login), balance_event(&player)],
        )
        .await;
    tracing::info!(user_id = %player.id, "Player authenticated");

    let now_ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    Json(AuthenticateResponse {
        sid: format!("session-{}-{now_ms}", player.id),
        currency: player.currency.clone(),
        user: player,
        origin: state.origin(),
        telemetry,
    })
}
