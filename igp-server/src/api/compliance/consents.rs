use axum::{
    Json,
    extract::{Path, State},
};
use igp_core::events::TelemetryEvent;
use igp_sdk::objects::{ConsentsPayload, StatusResponse, TelemetryRecord};
use serde_json::{Value, json};

use crate::api::extractors::{ApiJson, PlayerAuth, Principal};
use crate::state::AppState;

/// `GET /userconsents/{user_id}`: the standard marketing consents.
pub(super) async fn get_consents(
    state: State<AppState>,
    _auth: Principal,
    Path(user_id): Path<String>,
) -> Json<ConsentsPayload> {
    let consents = ConsentsPayload::standard();
    state.activity.inbound(
        "GET",
        &format!("/userconsents/{user_id}"),
        200,
        json!({}),
        serde_json::to_value(&consents).unwrap_or(Value::Null),
    );
    Json(consents)
}

/// `POST /userconsents/{user_id}`: consent change reported by FT.
pub(super) async fn post_consents(
    state: State<AppState>,
    auth: Principal,
    Path(user_id): Path<String>,
    ApiJson(body): ApiJson<ConsentsPayload>,
) -> Json<StatusResponse> {
    tracing::info!(caller = auth.caller(), %user_id, consents = body.consents.len(), "Consents updated");
    let request = serde_json::to_value(&body).unwrap_or(Value::Null);
    let telemetry = forward(&state, &user_id, body).await;

    state.activity.inbound(
        "POST",
        &format!("/userconsents/{user_id}"),
        200,
        request,
        json!({ "status": "success" }),
    );
    Json(success(state.origin(), telemetry))
}

/// `PUT /userconsents/{user_id}`: consent change made on the dashboard.
pub(super) async fn put_consents(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
    Path(user_id): Path<String>,
    ApiJson(body): ApiJson<ConsentsPayload>,
) -> Json<StatusResponse> {
    tracing::info!(caller = %player.id, %user_id, consents = body.consents.len(), "Consents submitted");
    let telemetry = forward(&state, &user_id, body).await;
    Json(success(state.origin(), telemetry))
}

async fn forward(state: &AppState, user_id: &str, body: ConsentsPayload) -> Vec<TelemetryRecord> {
    state
        .telemetry
        .emit(user_id, [TelemetryEvent::Consents(body.consents)])
        .await
}

fn success(origin: String, telemetry: Vec<TelemetryRecord>) -> StatusResponse {
    StatusResponse {
        status: "success".to_string(),
        message: None,
        origin,
        telemetry,
    }
}
