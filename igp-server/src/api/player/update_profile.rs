use axum::{Json, extract::State};
use igp_core::entities::User;
use igp_core::events::TelemetryEvent;
use igp_sdk::objects::{ProfileUpdate, TelemetryRecord};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, PlayerAuth};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub(super) struct ProfileResponse {
    status: &'static str,
    user: User,
    #[serde(rename = "_telemetry")]
    telemetry: Vec<TelemetryRecord>,
}

/// `POST /user/update`: edit profile fields and notify FT.
///
/// Blank fields are ignored.
pub(super) async fn update_profile(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let update = body.normalized();
    let user = if update.is_empty() {
        player
    } else {
        state.store.update_profile(&player.id, &update).await?
    };

    let telemetry = state
        .telemetry
        .emit(&user.id, [TelemetryEvent::UserUpdate])
        .await;

    Ok(Json(ProfileResponse {
        status: "success",
        user,
        telemetry,
    }))
}
